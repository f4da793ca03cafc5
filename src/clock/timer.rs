// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Countdown clock.

use std::time::Duration;

use super::builder::TimerBuilder;
use super::engine::ClockEngine;
use super::millis_of;
use super::state::ClockState;
use crate::error::Result;
use crate::subscription::{Subscribable, SubscriptionId};

/// A clock counting remaining time down to zero.
///
/// When the remaining time reaches zero the timer emits a final zero tick,
/// notifies its finish listeners and resets itself to
/// [`ClockState::Idle`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use tickmark::{ClockState, Timer};
/// use tickmark::clock::ManualScheduler;
///
/// let scheduler = ManualScheduler::new();
/// let done = Arc::new(AtomicBool::new(false));
/// let flag = done.clone();
///
/// let timer = Timer::builder()
///     .start_pattern("MM:SS")
///     .start_time(Duration::from_secs(30))
///     .change_pattern_at(Duration::from_secs(10), "SS.L")
///     .on_finish(move || flag.store(true, Ordering::SeqCst))
///     .scheduler(scheduler.clone())
///     .build()
///     .unwrap();
///
/// timer.start().unwrap();
/// scheduler.advance(Duration::from_secs(25));
/// assert_eq!(timer.remaining_formatted_time(), "05.0");
///
/// scheduler.advance(Duration::from_secs(5));
/// assert!(done.load(Ordering::SeqCst));
/// assert_eq!(timer.state(), ClockState::Idle);
/// ```
#[derive(Debug)]
pub struct Timer {
    engine: ClockEngine,
}

impl Timer {
    /// Creates a builder for configuring a timer.
    #[must_use]
    pub fn builder() -> TimerBuilder {
        TimerBuilder::new()
    }

    pub(crate) fn from_engine(engine: ClockEngine) -> Self {
        Self { engine }
    }

    /// Starts or resumes the countdown.
    ///
    /// Does nothing if already running. From [`ClockState::Idle`] the
    /// countdown restarts at the start time with every scheduled entry
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`](crate::Error::Released) after
    /// [`release`](Self::release).
    pub fn start(&self) -> Result<()> {
        self.engine.start()
    }

    /// Pauses the countdown, keeping the remaining time.
    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Jumps to `remaining`.
    ///
    /// Scheduled actions the jump skips over are dropped for this run and
    /// the pattern in force at `remaining` is selected. No tick is emitted.
    /// An idle timer becomes paused at `remaining`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`](crate::Error::Released) after
    /// [`release`](Self::release).
    pub fn set_time(&self, remaining: Duration) -> Result<()> {
        self.engine.set_time(millis_of(remaining))
    }

    /// Stops and returns to the start time with every scheduled entry
    /// pending again.
    pub fn reset(&self) {
        self.engine.reset();
    }

    /// Cancels pending work and drops all schedules and listeners.
    ///
    /// The timer cannot be started again.
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

    /// Remaining time, read live while running. Never below zero.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        Duration::from_millis(self.engine.value())
    }

    /// Remaining time rendered with the active pattern.
    #[must_use]
    pub fn remaining_formatted_time(&self) -> String {
        self.engine.formatted()
    }

    /// Start time rendered with the pattern in force at the start.
    #[must_use]
    pub fn formatted_start_time(&self) -> String {
        self.engine.formatted_start()
    }

    /// Subscribes to the end of the countdown.
    ///
    /// The callback runs once per completed run, after the final zero tick.
    pub fn on_finish<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.engine.callbacks().on_finish(callback)
    }
}

impl Subscribable for Timer {
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
