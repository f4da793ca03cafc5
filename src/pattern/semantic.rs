// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated description of a pattern.

use std::str::FromStr;

use super::{Analyzer, Position, TimeUnit};
use crate::error::PatternError;

/// Immutable metadata derived from a validated pattern.
///
/// A `Semantic` can only be obtained from an [`Analyzer`], so at least one
/// unit is always present. Positions refer to the escape-stripped
/// [`template`](Self::template), not to the raw pattern.
///
/// # Examples
///
/// ```
/// use tickmark::pattern::{Semantic, TimeUnit};
///
/// let semantic: Semantic = "MM#M SS#S".parse().unwrap();
/// assert_eq!(semantic.template(), "MMM SSS");
/// assert_eq!(semantic.pattern(), "MM#M SS#S");
/// assert_eq!(semantic.position(TimeUnit::Seconds).start(), Some(4));
/// assert_eq!(semantic.largest_unit(), TimeUnit::Minutes);
/// assert_eq!(semantic.smallest_unit(), TimeUnit::Seconds);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Semantic {
    positions: [Position; 4],
    pattern: String,
    template: String,
    smallest_unit: TimeUnit,
    largest_unit: TimeUnit,
}

impl Semantic {
    pub(crate) fn new(
        positions: [Position; 4],
        pattern: String,
        template: String,
        smallest_unit: TimeUnit,
        largest_unit: TimeUnit,
    ) -> Self {
        Self {
            positions,
            pattern,
            template,
            smallest_unit,
            largest_unit,
        }
    }

    /// The pattern exactly as it was supplied.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The pattern with escape symbols removed.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Where `unit` sits in the template.
    #[must_use]
    pub const fn position(&self, unit: TimeUnit) -> Position {
        self.positions[unit.index()]
    }

    /// Returns `true` if the pattern displays `unit`.
    #[must_use]
    pub const fn has(&self, unit: TimeUnit) -> bool {
        !self.position(unit).is_empty()
    }

    /// Returns `true` if the sub-second unit is the only unit present.
    #[must_use]
    pub const fn has_only_subsecond(&self) -> bool {
        self.has(TimeUnit::Subsecond)
            && !self.has(TimeUnit::Seconds)
            && !self.has(TimeUnit::Minutes)
            && !self.has(TimeUnit::Hours)
    }

    /// The finest unit present.
    #[must_use]
    pub const fn smallest_unit(&self) -> TimeUnit {
        self.smallest_unit
    }

    /// The coarsest unit present.
    #[must_use]
    pub const fn largest_unit(&self) -> TimeUnit {
        self.largest_unit
    }

    /// Declared width of the largest unit's field.
    #[must_use]
    pub fn largest_unit_len(&self) -> usize {
        self.position(self.largest_unit).len()
    }
}

impl FromStr for Semantic {
    type Err = PatternError;

    /// Analyzes `s` with the default symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Analyzer::default().analyze(s)
    }
}
