// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for clock events.
//!
//! # Overview
//!
//! The subscription system consists of:
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that manages callbacks and dispatches events
//! - [`Action`] - A one-shot callback fired at a scheduled threshold
//! - [`Subscribable`] - Trait for clocks that support tick subscriptions
//!
//! Both [`Stopwatch`](crate::Stopwatch) and [`Timer`](crate::Timer) implement
//! [`Subscribable`]. Only the timer has a finish event, exposed as
//! [`Timer::on_finish`](crate::Timer::on_finish).

mod callback;
mod subscribable;

pub use callback::{Action, CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
