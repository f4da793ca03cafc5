// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot callback schedulers that drive clocks.
//!
//! A clock never assumes a repeating primitive: it asks its scheduler for a
//! single callback after every tick. Cancellation only has to be best
//! effort, since every callback re-checks the clock's generation on delivery.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::millis_of;
use super::source::{ManualTimeSource, TimeSource};
use crate::error::ConfigError;

/// A callback handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs callbacks once after a delay.
///
/// A scheduler instance serves exactly one clock: [`cancel_all`] drops
/// everything it holds.
///
/// [`cancel_all`]: TickScheduler::cancel_all
pub trait TickScheduler: Send + Sync {
    /// Runs `task` once, `after` from now.
    fn schedule_once(&self, after: Duration, task: Task);

    /// Drops every task not yet started.
    fn cancel_all(&self);

    /// The time source this scheduler measures delays against, if it has
    /// its own.
    fn time_source(&self) -> Option<Arc<dyn TimeSource>> {
        None
    }
}

impl<S: TickScheduler + ?Sized> TickScheduler for Arc<S> {
    fn schedule_once(&self, after: Duration, task: Task) {
        (**self).schedule_once(after, task);
    }

    fn cancel_all(&self) {
        (**self).cancel_all();
    }

    fn time_source(&self) -> Option<Arc<dyn TimeSource>> {
        (**self).time_source()
    }
}

/// Spawns a sleeping task per callback on a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    handle: Handle,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Uses the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRuntime`] outside of a tokio runtime.
    pub fn try_current() -> Result<Self, ConfigError> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(|_| ConfigError::NoRuntime)
    }

    /// Uses the runtime behind `handle`.
    #[must_use]
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Mutex::new(Vec::new()),
        }
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_once(&self, after: Duration, task: Task) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|handle| !handle.is_finished());
        tasks.push(self.handle.spawn(async move {
            tokio::time::sleep(after).await;
            task();
        }));
    }

    fn cancel_all(&self) {
        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
    }
}

/// A deterministic scheduler advanced by hand.
///
/// Delays are measured against its own [`ManualTimeSource`], which a clock
/// built with this scheduler picks up automatically. Clones share the queue
/// and the time source.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use tickmark::clock::{ManualScheduler, TickScheduler};
///
/// let scheduler = ManualScheduler::new();
/// let hits = Arc::new(AtomicU32::new(0));
/// let counter = hits.clone();
/// scheduler.schedule_once(
///     Duration::from_millis(300),
///     Box::new(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// scheduler.advance(Duration::from_millis(299));
/// assert_eq!(hits.load(Ordering::SeqCst), 0);
/// scheduler.advance(Duration::from_millis(1));
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    source: ManualTimeSource,
    queue: Mutex<BTreeMap<(u64, u64), Task>>,
    next_seq: AtomicU64,
}

impl ManualScheduler {
    /// Creates a scheduler with a fresh time source at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler reading `source`.
    #[must_use]
    pub fn with_source(source: ManualTimeSource) -> Self {
        Self {
            inner: Arc::new(ManualInner {
                source,
                queue: Mutex::new(BTreeMap::new()),
                next_seq: AtomicU64::new(0),
            }),
        }
    }

    /// The time source delays are measured against.
    #[must_use]
    pub fn source(&self) -> ManualTimeSource {
        self.inner.source.clone()
    }

    /// Current reading of the time source.
    #[must_use]
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.inner.source.now_millis())
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Moves time forward by `by`, running every task that falls due.
    pub fn advance(&self, by: Duration) {
        self.run_until(self.now() + by);
    }

    /// Moves time forward to `at`, running every task that falls due.
    ///
    /// Tasks run in due order with the time source set to their due time.
    /// Tasks scheduled by a running task are picked up in the same call.
    pub fn run_until(&self, at: Duration) {
        let target = millis_of(at);
        loop {
            let next = {
                let mut queue = self.inner.queue.lock();
                match queue.first_key_value() {
                    Some((&(due, _), _)) if due <= target => queue.pop_first(),
                    _ => None,
                }
            };
            let Some(((due, _), task)) = next else {
                break;
            };
            self.inner.source.set(due);
            task();
        }
        self.inner.source.set(target);
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_once(&self, after: Duration, task: Task) {
        let due = self
            .inner
            .source
            .now_millis()
            .saturating_add(millis_of(after));
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        self.inner.queue.lock().insert((due, seq), task);
    }

    fn cancel_all(&self) {
        self.inner.queue.lock().clear();
    }

    fn time_source(&self) -> Option<Arc<dyn TimeSource>> {
        Some(Arc::new(self.inner.source.clone()))
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
