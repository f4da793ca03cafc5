// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incremental rendering of millisecond values.

use std::time::Duration;

use super::DelayMode;
use super::breakdown::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use super::breakdown::{digit_count, unit_value, write_digits};
use crate::pattern::{Semantic, TimeUnit};

/// Renders millisecond values through one [`Semantic`].
///
/// The formatter keeps its character buffer between calls. The field of the
/// largest unit grows with leading digits when a value no longer fits and
/// keeps that width for later, larger values. A value lower than the
/// previous one starts a new sequence and restores the template width.
///
/// # Examples
///
/// ```
/// use tickmark::format::TimeFormatter;
///
/// let mut formatter = TimeFormatter::new("SS:LLL".parse().unwrap());
/// assert_eq!(formatter.format(99_077), "99:077");
/// assert_eq!(formatter.format(101_049), "101:049");
/// assert_eq!(formatter.format(35), "00:035");
/// ```
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    semantic: Semantic,
    buffer: Vec<char>,
    rendered: String,
    growth: usize,
    last_millis: u64,
}

impl TimeFormatter {
    /// Creates a formatter showing the bare template.
    #[must_use]
    pub fn new(semantic: Semantic) -> Self {
        let buffer: Vec<char> = semantic.template().chars().collect();
        let rendered = semantic.template().to_string();
        Self {
            semantic,
            buffer,
            rendered,
            growth: 0,
            last_millis: 0,
        }
    }

    /// The pattern this formatter renders.
    #[must_use]
    pub const fn semantic(&self) -> &Semantic {
        &self.semantic
    }

    /// The most recently rendered text, or the template before any call.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.rendered
    }

    /// Restores the template width and forgets the previous value.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer.extend(self.semantic.template().chars());
        self.growth = 0;
        self.last_millis = 0;
    }

    /// Renders `millis` and returns the text.
    pub fn format(&mut self, millis: u64) -> &str {
        if millis < self.last_millis {
            self.reset();
        }
        self.last_millis = millis;

        let largest = self.semantic.largest_unit();
        let largest_start = self.semantic.position(largest).start().unwrap_or(0);

        for unit in TimeUnit::ALL {
            let Some((start, end)) = self.semantic.position(unit).bounds() else {
                continue;
            };
            let value = unit_value(&self.semantic, unit, millis);

            if unit == largest {
                let width = end - start + 1 + self.growth;
                let needed = digit_count(value);
                if needed > width {
                    let extra = needed - width;
                    self.buffer
                        .splice(start..start, std::iter::repeat_n('0', extra));
                    self.growth += extra;
                }
                write_digits(&mut self.buffer[start..=end + self.growth], value);
            } else {
                let shift = if start > largest_start { self.growth } else { 0 };
                write_digits(&mut self.buffer[start + shift..=end + shift], value);
            }
        }

        self.rendered.clear();
        self.rendered.extend(self.buffer.iter());
        &self.rendered
    }

    /// Suggested interval between two renders.
    ///
    /// [`DelayMode::BestEffort`] only looks at the sub-second width;
    /// [`DelayMode::Exact`] returns one step of the smallest unit shown.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use tickmark::format::{DelayMode, TimeFormatter};
    ///
    /// let formatter = TimeFormatter::new("HH:MM".parse().unwrap());
    /// assert_eq!(formatter.delay(DelayMode::BestEffort), Duration::from_millis(100));
    /// assert_eq!(formatter.delay(DelayMode::Exact), Duration::from_secs(60));
    /// ```
    #[must_use]
    pub fn delay(&self, mode: DelayMode) -> Duration {
        let millis = match mode {
            DelayMode::BestEffort => self.subsecond_step().unwrap_or(100),
            DelayMode::Exact => match self.semantic.smallest_unit() {
                TimeUnit::Hours => MILLIS_PER_HOUR,
                TimeUnit::Minutes => MILLIS_PER_MINUTE,
                TimeUnit::Seconds => MILLIS_PER_SECOND,
                TimeUnit::Subsecond => self.subsecond_step().unwrap_or(100),
            },
        };
        Duration::from_millis(millis)
    }

    fn subsecond_step(&self) -> Option<u64> {
        match self.semantic.position(TimeUnit::Subsecond).len() {
            2 => Some(10),
            len if len > 2 => Some(1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(pattern: &str) -> TimeFormatter {
        TimeFormatter::new(pattern.parse().unwrap())
    }

    fn once(pattern: &str, millis: u64) -> String {
        formatter(pattern).format(millis).to_string()
    }

    const fn hms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> u64 {
        hours * MILLIS_PER_HOUR
            + minutes * MILLIS_PER_MINUTE
            + seconds * MILLIS_PER_SECOND
            + millis
    }

    #[test]
    fn basic_rendering() {
        assert_eq!(once("SS:LL", 12_365), "12:36");
        assert_eq!(once("MM:SS.LL", 0), "00:00.00");
        assert_eq!(once("LLLLL", 1_200), "01200");
        assert_eq!(once("LLL", 159_999), "159999");
        assert_eq!(once("SSS", 63_789), "063");
        assert_eq!(once("MM min", hms(0, 49, 12, 0)), "49 min");
    }

    #[test]
    fn literal_text_between_fields() {
        assert_eq!(
            once("HHH_MMM qwerty SS lol LLL", hms(36, 6, 3, 19)),
            "036_006 qwerty 03 lol 019"
        );
        assert_eq!(once("SS lol LLL", hms(0, 13, 29, 1)), "809 lol 001");
        assert_eq!(once("SS lol LLLLLL", hms(0, 13, 29, 2)), "809 lol 000002");
        assert_eq!(once("SS lol L", 17), "00 lol 0");
        assert_eq!(once("SS lol LL", 17), "00 lol 01");
    }

    #[test]
    fn escaped_symbols_render_literally() {
        assert_eq!(
            once("HH#H MM#M SS#S LL#L#L", hms(4, 7, 49, 219)),
            "04H 07M 49S 21LL"
        );
        assert_eq!(once("#Hello +  SS:LL", hms(0, 1, 22, 167)), "Hello +  82:16");
        assert_eq!(once("#LA#LA#LA : MM-SS", hms(0, 8, 5, 0)), "LALALA : 08-05");
        assert_eq!(once("#Hello ## SS:LL", hms(0, 0, 36, 23)), "Hello ## 36:02");
    }

    #[test]
    fn largest_field_grows_across_calls() {
        let mut f = formatter("SS:LLL");
        assert_eq!(f.format(99_077), "99:077");
        assert_eq!(f.format(101_049), "101:049");
        assert_eq!(f.format(883_310_210), "883310:210");
    }

    #[test]
    fn lower_value_resets_growth() {
        let mut f = formatter("SS:LLL");
        assert_eq!(f.format(99_077), "99:077");
        assert_eq!(f.format(35), "00:035");
        assert_eq!(f.format(101_049), "101:049");
        assert_eq!(f.format(883_310_210), "883310:210");
        assert_eq!(f.format(5_000), "05:000");
    }

    #[test]
    fn grown_field_keeps_width_for_smaller_digit_counts() {
        let mut f = formatter("SS");
        assert_eq!(f.format(100_000), "100");
        // Same sequence, still increasing
        assert_eq!(f.format(100_500), "100");
    }

    #[test]
    fn growth_shifts_fields_after_largest_only() {
        let mut f = formatter("LL SS");
        assert_eq!(f.format(123_450), "45 123");

        let mut g = formatter("[MM:SS]");
        assert_eq!(g.format(hms(2, 3, 4, 0)), "[123:04]");
    }

    #[test]
    fn text_tracks_last_render() {
        let mut f = formatter("MM:SS");
        assert_eq!(f.text(), "MM:SS");
        f.format(61_000);
        assert_eq!(f.text(), "01:01");
        f.reset();
        assert_eq!(f.format(0), "00:00");
    }

    #[test]
    fn best_effort_delays() {
        let ms = Duration::from_millis;
        assert_eq!(formatter("MM:SS:LL").delay(DelayMode::BestEffort), ms(10));
        assert_eq!(formatter("MM:SS:L").delay(DelayMode::BestEffort), ms(100));
        assert_eq!(formatter("MM:SS::").delay(DelayMode::BestEffort), ms(100));
        assert_eq!(formatter("HH:MM").delay(DelayMode::BestEffort), ms(100));
        assert_eq!(formatter("MM:SS:LLL").delay(DelayMode::BestEffort), ms(1));
    }

    #[test]
    fn exact_delays() {
        let ms = Duration::from_millis;
        assert_eq!(formatter("MM:SS:LL").delay(DelayMode::Exact), ms(10));
        assert_eq!(formatter("MM:SS:L").delay(DelayMode::Exact), ms(100));
        assert_eq!(formatter("MM:SS::").delay(DelayMode::Exact), ms(1_000));
        assert_eq!(formatter("HH:MM").delay(DelayMode::Exact), ms(60_000));
        assert_eq!(formatter("MM:SS:LLL").delay(DelayMode::Exact), ms(1));
        assert_eq!(formatter("HH").delay(DelayMode::Exact), ms(3_600_000));
    }
}
