// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clock lifecycle states and counting direction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a clock.
///
/// ```text
/// Idle --start--> Running --stop--> Paused --start--> Running
///   ^                |                 |
///   +-----reset------+------reset------+
/// ```
///
/// A timer also returns from `Running` to `Idle` by itself when it reaches
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    /// Not started, or reset.
    #[default]
    Idle,
    /// Ticking.
    Running,
    /// Stopped with its value kept.
    Paused,
}

impl ClockState {
    /// Returns `true` while the clock is ticking.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Which way the clock value moves.
///
/// Values are signed so that a late countdown tick can land below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Elapsed time, increasing.
    CountUp,
    /// Remaining time, decreasing.
    CountDown,
}

impl Direction {
    /// Returns `true` once `value` has reached or passed `threshold`.
    pub(crate) fn reached(self, threshold: u64, value: i64) -> bool {
        let threshold = to_signed(threshold);
        match self {
            Self::CountUp => value >= threshold,
            Self::CountDown => value <= threshold,
        }
    }

    /// Milliseconds until `value` reaches `threshold`, if it lies strictly
    /// ahead.
    pub(crate) fn distance(self, value: i64, threshold: u64) -> Option<u64> {
        let threshold = to_signed(threshold);
        let ahead = match self {
            Self::CountUp => threshold - value,
            Self::CountDown => value - threshold,
        };
        u64::try_from(ahead).ok().filter(|ms| *ms > 0)
    }

    /// Value after `elapsed` milliseconds starting from `anchor`.
    pub(crate) fn advance(self, anchor: i64, elapsed: i64) -> i64 {
        match self {
            Self::CountUp => anchor.saturating_add(elapsed),
            Self::CountDown => anchor.saturating_sub(elapsed),
        }
    }

    /// How far `actual` is ahead of `reported` in the counting direction.
    pub(crate) fn lead(self, actual: i64, reported: i64) -> i64 {
        match self {
            Self::CountUp => actual - reported,
            Self::CountDown => reported - actual,
        }
    }
}

/// Converts a millisecond count to the signed domain, saturating.
pub(crate) fn to_signed(millis: u64) -> i64 {
    i64::try_from(millis).unwrap_or(i64::MAX)
}

/// Converts a signed clock value back to milliseconds, clamping at zero.
pub(crate) fn to_unsigned(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
