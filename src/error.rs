// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `tickmark` library.
//!
//! Failures are split by where they originate: pattern analysis, clock
//! configuration, and configuration documents. All of them are deterministic
//! functions of caller input and are surfaced immediately.

use std::fmt;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A pattern string was rejected by the analyzer.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// A clock was configured incompletely or inconsistently.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A configuration document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The clock was released and can no longer be driven.
    #[error("clock has been released")]
    Released,
}

/// Errors raised while analyzing a pattern string.
///
/// The analyzer never approximates: a pattern is either fully understood or
/// rejected with one of these variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern contains none of the unit symbols outside of escapes.
    #[error("no unit symbols found in pattern {pattern:?}")]
    NoRecognizedSymbols {
        /// The rejected pattern.
        pattern: String,
    },

    /// A unit symbol occurs in more than one run.
    #[error("unit symbol '{symbol}' appears in more than one run in pattern {pattern:?}")]
    NonContiguousSymbols {
        /// The symbol whose occurrences are split.
        symbol: char,
        /// The rejected pattern.
        pattern: String,
    },

    /// The set of units present makes no sense together.
    #[error("illegal unit combination in pattern {pattern:?}: {rule}")]
    IllegalUnitCombination {
        /// Which combination rule was violated.
        rule: CombinationRule,
        /// The rejected pattern.
        pattern: String,
    },
}

/// The unit combinations a pattern may not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinationRule {
    /// Hours with seconds or sub-second units, but no minutes.
    HoursWithoutMinutes,
    /// Hours, minutes and sub-second units, but no seconds.
    HoursAndMinutesWithoutSeconds,
    /// Minutes and sub-second units, but no seconds.
    MinutesWithoutSeconds,
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::HoursWithoutMinutes => {
                "hours with seconds or sub-second units require minutes"
            }
            Self::HoursAndMinutesWithoutSeconds => {
                "hours, minutes and sub-second units require seconds"
            }
            Self::MinutesWithoutSeconds => "minutes and sub-second units require seconds",
        };
        f.write_str(text)
    }
}

/// Errors raised while building or configuring a clock.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No start pattern was provided.
    #[error("start pattern is not set")]
    MissingStartPattern,

    /// A timer was built without a start time.
    #[error("start time is not set")]
    MissingStartTime,

    /// The same character was assigned to two pattern symbols.
    #[error("symbol '{0}' is assigned more than once")]
    DuplicateSymbol(char),

    /// No scheduler was given and no tokio runtime is available.
    #[error("no tokio runtime available to drive the clock")]
    NoRuntime,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
