// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stopwatch and timer clocks.
//!
//! A clock renders its value through a pattern on every tick, swaps to other
//! patterns at scheduled thresholds and fires scheduled actions once per run.
//!
//! # Driving a clock
//!
//! Clocks do not own a thread. They ask a [`TickScheduler`] for one callback
//! at a time and read a [`TimeSource`] to know where they are:
//!
//! - [`TokioScheduler`] with [`MonotonicSource`] - the default inside a tokio
//!   runtime
//! - [`ManualScheduler`] - time advanced explicitly by the host, useful for
//!   tests and for hosts with their own event loop
//!
//! # Tick interval
//!
//! With [`DelayMode::BestEffort`](crate::format::DelayMode::BestEffort) a
//! clock ticks every 100 ms, or faster when hundredths or milliseconds are
//! shown. With [`DelayMode::Exact`](crate::format::DelayMode::Exact) it ticks
//! once per step of the smallest unit shown; if no pattern of the clock
//! shows sub-second digits, reported values are also snapped to whole steps
//! and scheduling jitter is compensated on the next tick.

mod builder;
mod engine;
mod scheduler;
mod source;
mod state;
mod stopwatch;
mod timer;

use std::time::Duration;

pub use builder::{ClockBuilder, StopwatchBuilder, TimerBuilder};
pub use scheduler::{ManualScheduler, Task, TickScheduler, TokioScheduler};
pub use source::{ManualTimeSource, MonotonicSource, TimeSource};
pub use state::ClockState;
pub use stopwatch::Stopwatch;
pub use timer::Timer;

/// Whole milliseconds in `duration`, saturating.
pub(crate) fn millis_of(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
