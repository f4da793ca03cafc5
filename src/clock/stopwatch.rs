// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Count-up clock.

use std::time::Duration;

use super::builder::StopwatchBuilder;
use super::engine::ClockEngine;
use super::millis_of;
use super::state::ClockState;
use crate::error::Result;
use crate::subscription::{Subscribable, SubscriptionId};

/// A clock counting elapsed time up from its start time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tickmark::{ClockState, Stopwatch};
/// use tickmark::clock::ManualScheduler;
///
/// let scheduler = ManualScheduler::new();
/// let stopwatch = Stopwatch::builder()
///     .start_pattern("MM:SS")
///     .change_pattern_at(Duration::from_secs(3600), "HH:MM:SS")
///     .scheduler(scheduler.clone())
///     .build()
///     .unwrap();
///
/// stopwatch.start().unwrap();
/// scheduler.advance(Duration::from_secs(75));
/// assert_eq!(stopwatch.current_formatted_time(), "01:15");
///
/// stopwatch.stop();
/// scheduler.advance(Duration::from_secs(10));
/// assert_eq!(stopwatch.state(), ClockState::Paused);
/// assert_eq!(stopwatch.current_time(), Duration::from_secs(75));
/// ```
#[derive(Debug)]
pub struct Stopwatch {
    engine: ClockEngine,
}

impl Stopwatch {
    /// Creates a builder for configuring a stopwatch.
    #[must_use]
    pub fn builder() -> StopwatchBuilder {
        StopwatchBuilder::new()
    }

    pub(crate) fn from_engine(engine: ClockEngine) -> Self {
        Self { engine }
    }

    /// Starts or resumes counting.
    ///
    /// Does nothing if already running. From [`ClockState::Idle`] the count
    /// restarts at the start time with every scheduled entry pending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`](crate::Error::Released) after
    /// [`release`](Self::release).
    pub fn start(&self) -> Result<()> {
        self.engine.start()
    }

    /// Pauses counting, keeping the elapsed time.
    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Jumps to `time`.
    ///
    /// Scheduled actions the jump skips over are dropped for this run and
    /// the pattern in force at `time` is selected. No tick is emitted. An
    /// idle stopwatch becomes paused at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`](crate::Error::Released) after
    /// [`release`](Self::release).
    pub fn set_time(&self, time: Duration) -> Result<()> {
        self.engine.set_time(millis_of(time))
    }

    /// Stops and returns to the start time with every scheduled entry
    /// pending again.
    pub fn reset(&self) {
        self.engine.reset();
    }

    /// Cancels pending work and drops all schedules and listeners.
    ///
    /// The stopwatch cannot be started again.
    pub fn release(&self) {
        self.engine.release();
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ClockState {
        self.engine.state()
    }

    /// The configured start time.
    #[must_use]
    pub fn start_time(&self) -> Duration {
        Duration::from_millis(self.engine.start_value())
    }

    /// Elapsed time, read live while running.
    #[must_use]
    pub fn current_time(&self) -> Duration {
        Duration::from_millis(self.engine.value())
    }

    /// Elapsed time rendered with the active pattern.
    #[must_use]
    pub fn current_formatted_time(&self) -> String {
        self.engine.formatted()
    }

    /// Start time rendered with the pattern in force at the start.
    #[must_use]
    pub fn formatted_start_time(&self) -> String {
        self.engine.formatted_start()
    }
}

impl Subscribable for Stopwatch {
    fn on_tick<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Duration, &str) + Send + Sync + 'static,
    {
        self.engine.callbacks().on_tick(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.engine.callbacks().unsubscribe(id)
    }
}
