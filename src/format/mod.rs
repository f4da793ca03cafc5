// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering durations as text.
//!
//! [`TimeFormatter`] writes a millisecond value into the template of a
//! [`Semantic`](crate::pattern::Semantic):
//!
//! - every field is right-aligned and zero-padded to its width
//! - a unit is shown relative to the next coarser unit present, so `MM:SS`
//!   counts minutes past 59
//! - the largest unit's field grows when the value needs more digits
//! - `L`, `LL` and `LLL` show tenths, hundredths and milliseconds, unless
//!   the sub-second field is alone, in which case it shows the raw count

mod breakdown;
mod formatter;

use serde::{Deserialize, Serialize};

pub use formatter::TimeFormatter;

use crate::error::PatternError;
use crate::pattern::Analyzer;

/// How a clock picks the interval between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayMode {
    /// Tick often enough to look smooth; 100 ms unless finer sub-second
    /// digits are shown.
    #[default]
    BestEffort,
    /// Tick once per step of the smallest unit shown.
    Exact,
}

/// Renders `millis` through `pattern` in one call.
///
/// # Errors
///
/// Returns a [`PatternError`] if `pattern` is rejected by the analyzer.
///
/// # Examples
///
/// ```
/// assert_eq!(tickmark::format::format("MM:SS.LL", 83_456).unwrap(), "01:23.45");
/// assert!(tickmark::format::format("no units", 0).is_err());
/// ```
pub fn format(pattern: &str, millis: u64) -> Result<String, PatternError> {
    let semantic = Analyzer::default().analyze(pattern)?;
    let mut formatter = TimeFormatter::new(semantic);
    Ok(formatter.format(millis).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_mode_serde() {
        assert_eq!(serde_json::to_string(&DelayMode::Exact).unwrap(), "\"exact\"");
        let mode: DelayMode = serde_json::from_str("\"best_effort\"").unwrap();
        assert_eq!(mode, DelayMode::BestEffort);
        assert_eq!(DelayMode::default(), DelayMode::BestEffort);
    }

    #[test]
    fn one_shot_format() {
        assert_eq!(format("HH:MM:SS", 3_723_000).unwrap(), "01:02:03");
        assert!(matches!(
            format("HH:MM:L", 0),
            Err(PatternError::IllegalUnitCombination { .. })
        ));
    }
}
