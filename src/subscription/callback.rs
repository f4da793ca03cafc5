// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for clock events.
//!
//! This module provides the core types for managing clock callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks
//! - [`Action`] - A shareable one-shot callback attached to a schedule

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

/// Unique identifier for a subscription.
///
/// This ID is returned when registering a listener and can be used to
/// unsubscribe later. IDs are unique within a clock's lifetime.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tickmark::{Stopwatch, Subscribable};
/// use tickmark::clock::ManualScheduler;
///
/// let scheduler = ManualScheduler::new();
/// let stopwatch = Stopwatch::builder()
///     .start_pattern("SS")
///     .scheduler(scheduler.clone())
///     .build()
///     .unwrap();
///
/// let sub_id = stopwatch.on_tick(|elapsed, text| println!("{elapsed:?} {text}"));
///
/// // Later, unsubscribe
/// assert!(stopwatch.unsubscribe(sub_id));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for tick callbacks.
type TickCallback = Arc<dyn Fn(Duration, &str) + Send + Sync>;

/// Type alias for finish callbacks.
type FinishCallback = Arc<dyn Fn() + Send + Sync>;

/// A zero-argument callback fired when a clock reaches a threshold.
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() + Send + Sync>);

impl Action {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the closure.
    pub fn run(&self) {
        (self.0)();
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action")
    }
}

/// Registry for managing clock callbacks.
///
/// It uses thread-safe interior mutability via `parking_lot::RwLock`.
/// Dispatch works on a snapshot of the registered callbacks, so a callback
/// may subscribe or unsubscribe while it runs.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Tick callbacks.
    tick_callbacks: RwLock<HashMap<SubscriptionId, TickCallback>>,
    /// Finish callbacks.
    finish_callbacks: RwLock<HashMap<SubscriptionId, FinishCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tick_callbacks: RwLock::new(HashMap::new()),
            finish_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for ticks.
    ///
    /// The callback receives the clock value and its formatted text.
    pub fn on_tick<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Duration, &str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.tick_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for the end of a countdown.
    pub fn on_finish<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.finish_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.tick_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.finish_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.tick_callbacks.write().clear();
        self.finish_callbacks.write().clear();
    }

    /// Calls every tick callback. Order between callbacks is unspecified.
    pub fn dispatch_tick(&self, value: Duration, text: &str) {
        let callbacks: Vec<TickCallback> = self.tick_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(value, text);
        }
    }

    /// Calls every finish callback.
    pub fn dispatch_finish(&self) {
        let callbacks: Vec<FinishCallback> =
            self.finish_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.tick_callbacks.read().len() + self.finish_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_tick_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(Vec::<(Duration, String)>::new()));
        let received_clone = received.clone();

        let id = registry.on_tick(move |value, text| {
            received_clone.write().push((value, text.to_string()));
        });
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch_tick(Duration::from_secs(5), "00:05");
        assert_eq!(
            *received.read(),
            vec![(Duration::from_secs(5), "00:05".to_string())]
        );

        assert!(registry.unsubscribe(id));
        registry.dispatch_tick(Duration::from_secs(6), "00:06");
        assert_eq!(received.read().len(), 1);
    }

    #[test]
    fn registry_finish_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_finish(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.dispatch_tick(Duration::ZERO, "00");
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        registry.dispatch_finish();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_multiple_tick_callbacks() {
        let registry = CallbackRegistry::new();
        let counter1 = Arc::new(AtomicU32::new(0));
        let counter2 = Arc::new(AtomicU32::new(0));
        let c1 = counter1.clone();
        let c2 = counter2.clone();

        registry.on_tick(move |_, _| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_tick(move |_, _| {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_tick(Duration::ZERO, "");

        assert_eq!(counter1.load(Ordering::SeqCst), 1);
        assert_eq!(counter2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(RwLock::new(None::<SubscriptionId>));
        let counter = Arc::new(AtomicU32::new(0));

        let registry_clone = registry.clone();
        let slot_clone = slot.clone();
        let counter_clone = counter.clone();
        let id = registry.on_tick(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot_clone.read() {
                registry_clone.unsubscribe(id);
            }
        });
        *slot.write() = Some(id);

        registry.dispatch_tick(Duration::ZERO, "");
        registry.dispatch_tick(Duration::ZERO, "");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();
        registry.on_tick(|_, _| {});
        registry.on_finish(|| {});
        assert_eq!(registry.callback_count(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_tick(|_, _| {});
        let id2 = registry.on_finish(|| {});
        assert_ne!(id1, id2);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_tick(|_, _| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }

    #[test]
    fn action_runs_shared_closure() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let action = Action::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        let copy = action.clone();

        action.run();
        copy.run();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(format!("{action:?}"), "Action");
    }
}
