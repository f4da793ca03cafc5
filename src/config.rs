// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable clock configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::format::DelayMode;
use crate::pattern::{Symbols, SymbolsRepr};

/// A pattern that takes over once the clock reaches `at_millis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternChange {
    /// Threshold in milliseconds of clock value.
    pub at_millis: u64,
    /// The replacement pattern.
    pub pattern: String,
}

/// Configuration shared by stopwatches and timers.
///
/// Seeds a [`StopwatchBuilder`](crate::StopwatchBuilder) or
/// [`TimerBuilder`](crate::TimerBuilder) via `from_config`. Patterns are only
/// checked when the clock is built.
///
/// # Examples
///
/// ```
/// use tickmark::config::ClockConfig;
/// use tickmark::format::DelayMode;
///
/// let config = ClockConfig::from_json(r#"{
///     "pattern": "MM:SS",
///     "start_millis": 90000,
///     "delay_mode": "exact",
///     "pattern_changes": [{ "at_millis": 10000, "pattern": "SS.LL" }]
/// }"#).unwrap();
///
/// assert_eq!(config.delay_mode, DelayMode::Exact);
/// assert_eq!(config.pattern_changes.len(), 1);
///
/// // Programmatic equivalent
/// let same = ClockConfig::new("MM:SS")
///     .with_start_millis(90_000)
///     .with_delay_mode(DelayMode::Exact)
///     .with_pattern_change(10_000, "SS.LL");
/// assert_eq!(config, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClockConfig")]
pub struct ClockConfig {
    /// The start pattern.
    pub pattern: String,
    /// Start value; required for timers, defaults to zero for stopwatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_millis: Option<u64>,
    /// Tick interval policy.
    #[serde(default)]
    pub delay_mode: DelayMode,
    /// Pattern symbols.
    #[serde(default)]
    pub symbols: Symbols,
    /// Scheduled pattern swaps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_changes: Vec<PatternChange>,
}

/// Decoded form of [`ClockConfig`] before the symbols are checked.
#[derive(Deserialize)]
struct RawClockConfig {
    pattern: String,
    #[serde(default)]
    start_millis: Option<u64>,
    #[serde(default)]
    delay_mode: DelayMode,
    #[serde(default)]
    symbols: SymbolsRepr,
    #[serde(default)]
    pattern_changes: Vec<PatternChange>,
}

impl TryFrom<RawClockConfig> for ClockConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClockConfig) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            pattern: raw.pattern,
            start_millis: raw.start_millis,
            delay_mode: raw.delay_mode,
            symbols: Symbols::try_from(raw.symbols)?,
            pattern_changes: raw.pattern_changes,
        })
    }
}

impl ClockConfig {
    /// Creates a configuration with only a start pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            start_millis: None,
            delay_mode: DelayMode::default(),
            symbols: Symbols::default(),
            pattern_changes: Vec::new(),
        }
    }

    /// Decodes a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) for malformed documents
    /// and [`ConfigError::DuplicateSymbol`] for symbol sets reusing a
    /// character.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawClockConfig = serde_json::from_str(json)?;
        Ok(Self::try_from(raw)?)
    }

    /// Encodes the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sets the start value.
    #[must_use]
    pub fn with_start_millis(mut self, millis: u64) -> Self {
        self.start_millis = Some(millis);
        self
    }

    /// Sets the tick interval policy.
    #[must_use]
    pub fn with_delay_mode(mut self, mode: DelayMode) -> Self {
        self.delay_mode = mode;
        self
    }

    /// Sets the pattern symbols.
    #[must_use]
    pub fn with_symbols(mut self, symbols: Symbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Adds a scheduled pattern swap.
    #[must_use]
    pub fn with_pattern_change(mut self, at_millis: u64, pattern: impl Into<String>) -> Self {
        self.pattern_changes.push(PatternChange {
            at_millis,
            pattern: pattern.into(),
        });
        self
    }

    /// The start value as a duration, if set.
    #[must_use]
    pub fn start_time(&self) -> Option<Duration> {
        self.start_millis.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pattern::TimeUnit;

    #[test]
    fn minimal_document_uses_defaults() {
        let config = ClockConfig::from_json(r#"{"pattern": "SS"}"#).unwrap();
        assert_eq!(config, ClockConfig::new("SS"));
        assert_eq!(config.start_time(), None);
        assert_eq!(config.symbols, Symbols::default());
    }

    #[test]
    fn custom_symbols_in_document() {
        let config = ClockConfig::from_json(
            r#"{"pattern": "mm:ss", "symbols": {"hours": "h", "minutes": "m", "seconds": "s", "subsecond": "l", "escape": "!"}}"#,
        )
        .unwrap();
        assert_eq!(config.symbols.symbol_of(TimeUnit::Minutes), 'm');
        assert_eq!(config.symbols.escape(), '!');
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let result = ClockConfig::from_json(
            r#"{"pattern": "SS", "symbols": {"escape": "S"}}"#,
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::DuplicateSymbol('S')))
        ));
    }

    #[test]
    fn embedded_config_still_checks_symbols() {
        let result: std::result::Result<ClockConfig, _> = serde_json::from_str(
            r#"{"pattern": "SS", "symbols": {"hours": "M"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_pattern_rejected() {
        assert!(ClockConfig::from_json(r#"{"start_millis": 5}"#).is_err());
    }

    #[test]
    fn json_round_trip_preserves_changes() {
        let config = ClockConfig::new("HH:MM:SS")
            .with_start_millis(3_600_000)
            .with_pattern_change(60_000, "SS");
        let json = config.to_json().unwrap();
        assert!(json.contains("\"pattern_changes\""));
        assert_eq!(ClockConfig::from_json(&json).unwrap(), config);
    }
}
