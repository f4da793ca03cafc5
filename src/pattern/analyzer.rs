// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pattern validation and metadata extraction.

use super::{Position, Semantic, Symbols, TimeUnit};
use crate::error::{CombinationRule, PatternError};

/// Turns pattern strings into [`Semantic`] values.
///
/// A unit symbol directly preceded by the escape symbol is literal text: it
/// is neither a unit occurrence nor a break in another unit's run, and the
/// escape itself is dropped from the display template.
///
/// # Examples
///
/// ```
/// use tickmark::pattern::{Analyzer, TimeUnit};
///
/// let analyzer = Analyzer::default();
///
/// let semantic = analyzer.analyze("HH#H MM#M").unwrap();
/// assert_eq!(semantic.template(), "HHH MMM");
/// assert_eq!(semantic.position(TimeUnit::Minutes).bounds(), Some((4, 5)));
///
/// assert!(analyzer.analyze("qwerty").is_err());
/// assert!(analyzer.analyze("HH:MM:L").is_err());
/// assert!(analyzer.analyze("H#HH").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyzer {
    symbols: Symbols,
}

impl Analyzer {
    /// Creates an analyzer for the given symbol set.
    #[must_use]
    pub const fn new(symbols: Symbols) -> Self {
        Self { symbols }
    }

    /// The symbols this analyzer recognizes.
    #[must_use]
    pub const fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Validates `pattern` and derives its [`Semantic`].
    ///
    /// # Errors
    ///
    /// - [`PatternError::NonContiguousSymbols`] if a unit symbol's unescaped
    ///   occurrences do not form one unbroken run
    /// - [`PatternError::NoRecognizedSymbols`] if no unit symbol is present
    /// - [`PatternError::IllegalUnitCombination`] if the units present make
    ///   no sense together
    pub fn analyze(&self, pattern: &str) -> Result<Semantic, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();

        let mut positions = [Position::EMPTY; 4];
        for unit in TimeUnit::ALL {
            positions[unit.index()] = self.locate(unit, &chars, pattern)?;
        }

        if positions.iter().all(Position::is_empty) {
            return Err(PatternError::NoRecognizedSymbols {
                pattern: pattern.to_string(),
            });
        }

        let has = |unit: TimeUnit| !positions[unit.index()].is_empty();
        if let Some(rule) = violated_rule(
            has(TimeUnit::Hours),
            has(TimeUnit::Minutes),
            has(TimeUnit::Seconds),
            has(TimeUnit::Subsecond),
        ) {
            return Err(PatternError::IllegalUnitCombination {
                rule,
                pattern: pattern.to_string(),
            });
        }

        let smallest_unit = [TimeUnit::Subsecond, TimeUnit::Seconds, TimeUnit::Minutes]
            .into_iter()
            .find(|unit| has(*unit))
            .unwrap_or(TimeUnit::Hours);
        let largest_unit = [TimeUnit::Hours, TimeUnit::Minutes, TimeUnit::Seconds]
            .into_iter()
            .find(|unit| has(*unit))
            .unwrap_or(TimeUnit::Subsecond);

        tracing::trace!(pattern, ?smallest_unit, ?largest_unit, "Analyzed pattern");

        Ok(Semantic::new(
            positions,
            pattern.to_string(),
            self.strip(&chars),
            smallest_unit,
            largest_unit,
        ))
    }

    /// Finds the run of `unit`'s symbol, in template coordinates.
    fn locate(
        &self,
        unit: TimeUnit,
        chars: &[char],
        pattern: &str,
    ) -> Result<Position, PatternError> {
        let symbol = self.symbols.symbol_of(unit);
        let mut run: Option<(usize, usize)> = None;

        for (i, &c) in chars.iter().enumerate() {
            if c != symbol || self.is_escaped(chars, i) {
                continue;
            }
            run = match run {
                None => Some((i, i)),
                Some((start, end)) if end + 1 == i => Some((start, i)),
                Some(_) => {
                    return Err(PatternError::NonContiguousSymbols {
                        symbol,
                        pattern: pattern.to_string(),
                    });
                }
            };
        }

        Ok(run
            .and_then(|(start, end)| {
                Position::new(
                    start - self.stripped_before(chars, start),
                    end - self.stripped_before(chars, end),
                )
            })
            .unwrap_or(Position::EMPTY))
    }

    fn is_escaped(&self, chars: &[char], i: usize) -> bool {
        i > 0 && chars[i - 1] == self.symbols.escape()
    }

    fn is_escape_pair(&self, pair: &[char]) -> bool {
        pair[0] == self.symbols.escape() && self.symbols.is_unit_symbol(pair[1])
    }

    /// Number of escape characters before index `i` that the template drops.
    fn stripped_before(&self, chars: &[char], i: usize) -> usize {
        chars[..i]
            .windows(2)
            .filter(|pair| self.is_escape_pair(pair))
            .count()
    }

    fn strip(&self, chars: &[char]) -> String {
        let mut template = String::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            let escapes_unit = chars
                .get(i..i + 2)
                .is_some_and(|pair| self.is_escape_pair(pair));
            if !escapes_unit {
                template.push(c);
            }
        }
        template
    }
}

fn violated_rule(
    hours: bool,
    minutes: bool,
    seconds: bool,
    subsecond: bool,
) -> Option<CombinationRule> {
    if hours && (seconds || subsecond) && !minutes {
        Some(CombinationRule::HoursWithoutMinutes)
    } else if hours && minutes && subsecond && !seconds {
        Some(CombinationRule::HoursAndMinutesWithoutSeconds)
    } else if !hours && minutes && subsecond && !seconds {
        Some(CombinationRule::MinutesWithoutSeconds)
    } else {
        None
    }
}
