// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposition of a millisecond value into per-unit field values.

use crate::pattern::{Semantic, TimeUnit};

pub(crate) const MILLIS_PER_SECOND: u64 = 1_000;
pub(crate) const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub(crate) const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Value displayed in `unit`'s field for `millis`.
///
/// Each unit is taken relative to the next coarser unit the pattern shows,
/// so a pattern without hours shows total minutes.
pub(crate) fn unit_value(semantic: &Semantic, unit: TimeUnit, millis: u64) -> u64 {
    match unit {
        TimeUnit::Hours => millis / MILLIS_PER_HOUR,
        TimeUnit::Minutes => {
            let minutes = millis / MILLIS_PER_MINUTE;
            if semantic.has(TimeUnit::Hours) {
                minutes % 60
            } else {
                minutes
            }
        }
        TimeUnit::Seconds => {
            let seconds = millis / MILLIS_PER_SECOND;
            if semantic.has(TimeUnit::Minutes) {
                seconds % 60
            } else {
                seconds
            }
        }
        TimeUnit::Subsecond => {
            if semantic.has_only_subsecond() {
                return millis;
            }
            let rem = millis % MILLIS_PER_SECOND;
            match semantic.position(TimeUnit::Subsecond).len() {
                1 => rem / 100,
                2 => rem / 10,
                _ => rem,
            }
        }
    }
}

/// Number of decimal digits needed to print `value`.
pub(crate) fn digit_count(value: u64) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Writes `value` right-aligned and zero-padded into `slot`.
///
/// Digits that do not fit are dropped from the high end.
pub(crate) fn write_digits(slot: &mut [char], mut value: u64) {
    for cell in slot.iter_mut().rev() {
        #[allow(clippy::cast_possible_truncation)]
        let digit = (value % 10) as u8;
        *cell = char::from(b'0' + digit);
        value /= 10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semantic(pattern: &str) -> Semantic {
        pattern.parse().unwrap()
    }

    #[test]
    fn minutes_are_total_without_hours() {
        let millis = 2 * MILLIS_PER_HOUR + 5 * MILLIS_PER_MINUTE;
        assert_eq!(unit_value(&semantic("MM:SS"), TimeUnit::Minutes, millis), 125);
        assert_eq!(unit_value(&semantic("HH:MM"), TimeUnit::Minutes, millis), 5);
    }

    #[test]
    fn seconds_are_total_without_minutes() {
        assert_eq!(unit_value(&semantic("SS"), TimeUnit::Seconds, 63_789), 63);
        assert_eq!(unit_value(&semantic("MM:SS"), TimeUnit::Seconds, 63_789), 3);
    }

    #[test]
    fn subsecond_precision_follows_width() {
        assert_eq!(unit_value(&semantic("SS.L"), TimeUnit::Subsecond, 12_365), 3);
        assert_eq!(unit_value(&semantic("SS.LL"), TimeUnit::Subsecond, 12_365), 36);
        assert_eq!(unit_value(&semantic("SS.LLLL"), TimeUnit::Subsecond, 12_365), 365);
        assert_eq!(unit_value(&semantic("LL"), TimeUnit::Subsecond, 12_365), 12_365);
    }

    #[test]
    fn digit_counts() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(883_310), 6);
        assert_eq!(digit_count(u64::MAX), 20);
    }

    #[test]
    fn write_pads_and_truncates() {
        let mut slot = ['x'; 4];
        write_digits(&mut slot, 42);
        assert_eq!(slot, ['0', '0', '4', '2']);

        let mut narrow = ['x'; 2];
        write_digits(&mut narrow, 809);
        assert_eq!(narrow, ['0', '9']);
    }
}
