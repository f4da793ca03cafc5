// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit symbols and the escape symbol of the pattern language.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A time unit that a pattern can display.
///
/// Variants are ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Whole hours.
    Hours,
    /// Whole minutes.
    Minutes,
    /// Whole seconds.
    Seconds,
    /// Tenths, hundredths or thousandths of a second depending on the field
    /// width, or a raw millisecond count when it is the only unit.
    Subsecond,
}

impl TimeUnit {
    /// All units, coarsest first.
    pub const ALL: [Self; 4] = [Self::Hours, Self::Minutes, Self::Seconds, Self::Subsecond];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Hours => 0,
            Self::Minutes => 1,
            Self::Seconds => 2,
            Self::Subsecond => 3,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Subsecond => "sub-second",
        };
        f.write_str(name)
    }
}

/// The characters a pattern uses for each unit and for escaping.
///
/// The five characters must be distinct. Any other character in a pattern is
/// literal text.
///
/// # Examples
///
/// ```
/// use tickmark::pattern::{Symbols, TimeUnit};
///
/// let symbols = Symbols::default();
/// assert_eq!(symbols.symbol_of(TimeUnit::Minutes), 'M');
/// assert_eq!(symbols.escape(), '#');
///
/// // Lowercase symbols with a backslash escape
/// let custom = Symbols::new('h', 'm', 's', 'l', '\\').unwrap();
/// assert_eq!(custom.unit_of('s'), Some(TimeUnit::Seconds));
///
/// // Duplicates are rejected
/// assert!(Symbols::new('h', 'h', 's', 'l', '#').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SymbolsRepr", into = "SymbolsRepr")]
pub struct Symbols {
    units: [char; 4],
    escape: char,
}

impl Symbols {
    /// The default symbols: `H`, `M`, `S`, `L` and `#`.
    pub const DEFAULT: Self = Self {
        units: ['H', 'M', 'S', 'L'],
        escape: '#',
    };

    /// Creates a symbol set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateSymbol`] if any two characters coincide.
    pub fn new(
        hours: char,
        minutes: char,
        seconds: char,
        subsecond: char,
        escape: char,
    ) -> Result<Self, ConfigError> {
        let all = [hours, minutes, seconds, subsecond, escape];
        for (i, c) in all.iter().enumerate() {
            if all[i + 1..].contains(c) {
                return Err(ConfigError::DuplicateSymbol(*c));
            }
        }
        Ok(Self {
            units: [hours, minutes, seconds, subsecond],
            escape,
        })
    }

    /// Returns the character used for `unit`.
    #[must_use]
    pub const fn symbol_of(&self, unit: TimeUnit) -> char {
        self.units[unit.index()]
    }

    /// Returns the escape character.
    #[must_use]
    pub const fn escape(&self) -> char {
        self.escape
    }

    /// Returns the unit a character stands for, if any.
    #[must_use]
    pub fn unit_of(&self, c: char) -> Option<TimeUnit> {
        TimeUnit::ALL
            .into_iter()
            .find(|unit| self.symbol_of(*unit) == c)
    }

    /// Returns `true` if `c` is one of the four unit symbols.
    #[must_use]
    pub fn is_unit_symbol(&self, c: char) -> bool {
        self.units.contains(&c)
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Serialized form of [`Symbols`]; every field falls back to its default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SymbolsRepr {
    hours: char,
    minutes: char,
    seconds: char,
    subsecond: char,
    escape: char,
}

impl Default for SymbolsRepr {
    fn default() -> Self {
        Symbols::DEFAULT.into()
    }
}

impl From<Symbols> for SymbolsRepr {
    fn from(symbols: Symbols) -> Self {
        let [hours, minutes, seconds, subsecond] = symbols.units;
        Self {
            hours,
            minutes,
            seconds,
            subsecond,
            escape: symbols.escape,
        }
    }
}

impl TryFrom<SymbolsRepr> for Symbols {
    type Error = ConfigError;

    fn try_from(repr: SymbolsRepr) -> Result<Self, Self::Error> {
        Self::new(
            repr.hours,
            repr.minutes,
            repr.seconds,
            repr.subsecond,
            repr.escape,
        )
    }
}
