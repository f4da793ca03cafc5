// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Threshold-ordered schedule tables.

/// A payload attached to a millisecond threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry<T> {
    /// Threshold in milliseconds of clock value.
    pub at: u64,
    /// What happens when the threshold is reached.
    pub payload: T,
}

/// Entries sorted by ascending threshold, at most one per threshold.
///
/// # Examples
///
/// ```
/// use tickmark::schedule::Schedule;
///
/// let mut schedule = Schedule::new();
/// assert!(schedule.insert(5_000, "five"));
/// assert!(schedule.insert(1_000, "one"));
/// // First insert wins
/// assert!(!schedule.insert(5_000, "again"));
///
/// let thresholds: Vec<u64> = schedule.iter().map(|e| e.at).collect();
/// assert_eq!(thresholds, [1_000, 5_000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<T> {
    entries: Vec<ScheduleEntry<T>>,
}

impl<T> Schedule<T> {
    /// Creates an empty schedule.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry, keeping the table sorted.
    ///
    /// Returns `false` and drops `payload` if an entry already exists at `at`.
    pub fn insert(&mut self, at: u64, payload: T) -> bool {
        match self.entries.binary_search_by_key(&at, |entry| entry.at) {
            Ok(_) => false,
            Err(index) => {
                self.entries.insert(index, ScheduleEntry { at, payload });
                true
            }
        }
    }

    /// Iterates entries in ascending threshold order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry<T>> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schedule has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns the entries matching `reached`, in ascending order.
    pub(crate) fn take_reached(
        &mut self,
        mut reached: impl FnMut(u64) -> bool,
    ) -> Vec<ScheduleEntry<T>> {
        let (taken, kept) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| reached(entry.at));
        self.entries = kept;
        taken
    }

    /// Keeps only the entries matching `keep`.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&ScheduleEntry<T>) -> bool) {
        self.entries.retain(|entry| keep(entry));
    }
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Schedule<T> {
    type Item = &'a ScheduleEntry<T>;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_dropped() {
        let mut schedule = Schedule::new();
        assert!(schedule.insert(10, 'a'));
        assert!(!schedule.insert(10, 'b'));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.iter().next().map(|e| e.payload), Some('a'));
    }

    #[test]
    fn sorted_regardless_of_insert_order() {
        let mut schedule = Schedule::new();
        for at in [30, 10, 20, 0] {
            schedule.insert(at, ());
        }
        let thresholds: Vec<u64> = (&schedule).into_iter().map(|e| e.at).collect();
        assert_eq!(thresholds, [0, 10, 20, 30]);
    }

    #[test]
    fn take_reached_removes_matching() {
        let mut schedule = Schedule::new();
        for at in [100, 200, 300] {
            schedule.insert(at, at * 2);
        }
        let taken = schedule.take_reached(|at| at <= 200);
        assert_eq!(
            taken.iter().map(|e| e.payload).collect::<Vec<_>>(),
            [200, 400]
        );
        assert_eq!(schedule.len(), 1);
        assert!(schedule.take_reached(|_| false).is_empty());
    }

    #[test]
    fn retain_and_clear() {
        let mut schedule = Schedule::new();
        for at in [1, 2, 3, 4] {
            schedule.insert(at, ());
        }
        schedule.retain(|e| e.at % 2 == 0);
        assert_eq!(schedule.len(), 2);
        schedule.clear();
        assert!(schedule.is_empty());
    }
}
