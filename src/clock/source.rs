// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monotonic millisecond time sources.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// A monotonic clock reading in milliseconds.
///
/// Readings must never decrease and must not follow wall-clock changes.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;
}

/// Reads [`tokio::time::Instant`], so paused tokio time is honoured.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    /// Creates a source whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_millis(&self) -> u64 {
        super::millis_of(self.origin.elapsed())
    }
}

/// A time source moved by hand.
///
/// Clones share the same reading.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tickmark::clock::{ManualTimeSource, TimeSource};
///
/// let source = ManualTimeSource::new();
/// let view = source.clone();
/// source.advance(Duration::from_millis(1_500));
/// assert_eq!(view.now_millis(), 1_500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    millis: Arc<AtomicU64>,
}

impl ManualTimeSource {
    /// Creates a source reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the reading forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(super::millis_of(by), Ordering::SeqCst);
    }

    /// Moves the reading to `millis` if that is later than the current one.
    pub fn set(&self, millis: u64) {
        self.millis.fetch_max(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_source_never_goes_back() {
        let source = ManualTimeSource::new();
        source.set(500);
        source.set(200);
        assert_eq!(source.now_millis(), 500);
        source.advance(Duration::from_millis(20));
        assert_eq!(source.now_millis(), 520);
    }

    #[tokio::test(start_paused = true)]
    async fn monotonic_source_follows_tokio_time() {
        let source = MonotonicSource::new();
        assert_eq!(source.now_millis(), 0);
        tokio::time::advance(Duration::from_millis(750)).await;
        assert_eq!(source.now_millis(), 750);
    }
}
