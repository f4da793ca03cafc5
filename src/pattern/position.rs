// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Character ranges occupied by a unit field.

/// An inclusive character range `[start, end]` in a display template, or the
/// empty position for a unit that the pattern does not contain.
///
/// Indices count characters, not bytes.
///
/// # Examples
///
/// ```
/// use tickmark::pattern::Position;
///
/// let pos = Position::new(2, 6).unwrap();
/// assert_eq!(pos.len(), 5);
/// assert_eq!(pos.start(), Some(2));
///
/// assert!(Position::EMPTY.is_empty());
/// assert_eq!(Position::EMPTY.len(), 0);
///
/// // start must not exceed end
/// assert!(Position::new(8, 3).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    bounds: Option<(usize, usize)>,
}

impl Position {
    /// The position of an absent unit.
    pub const EMPTY: Self = Self { bounds: None };

    /// Creates a position spanning `start..=end`.
    ///
    /// Returns `None` if `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self {
            bounds: Some((start, end)),
        })
    }

    /// Returns `true` for the position of an absent unit.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// First character index of the field.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.bounds.map(|(start, _)| start)
    }

    /// Last character index of the field.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.bounds.map(|(_, end)| end)
    }

    /// Both bounds, if present.
    #[must_use]
    pub const fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    /// Number of characters in the field; 0 when empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.map_or(0, |(start, end)| end - start + 1)
    }
}
