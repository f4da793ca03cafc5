// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for clocks that emit ticks.

use std::time::Duration;

use crate::subscription::SubscriptionId;

/// Trait for clocks that notify listeners on every tick.
///
/// Listeners run on the thread that drives the clock, after the clock's
/// internal lock has been released. They may call back into the clock.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tickmark::{Subscribable, Timer};
/// use tickmark::clock::ManualScheduler;
///
/// let scheduler = ManualScheduler::new();
/// let timer = Timer::builder()
///     .start_pattern("MM:SS")
///     .start_time(Duration::from_secs(90))
///     .scheduler(scheduler.clone())
///     .build()
///     .unwrap();
///
/// let sub_id = timer.on_tick(|remaining, text| {
///     println!("{text} ({} ms left)", remaining.as_millis());
/// });
///
/// timer.start().unwrap();
/// scheduler.advance(Duration::from_secs(1));
///
/// timer.unsubscribe(sub_id);
/// ```
pub trait Subscribable {
    /// Subscribes to ticks.
    ///
    /// The callback receives the clock value and its formatted text. It is
    /// not called for [`set_time`](crate::Stopwatch::set_time).
    fn on_tick<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Duration, &str) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
