// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The state machine shared by [`Stopwatch`](crate::Stopwatch) and
//! [`Timer`](crate::Timer).
//!
//! All mutable state lives behind one mutex. Scheduled callbacks carry the
//! generation that was current when they were armed and do nothing if it
//! has moved on, so `stop`, `reset` and `release` take effect even for
//! callbacks the scheduler already queued. Listeners and actions run after
//! the state lock is released, but inside a reentrant gate that control
//! operations also take: once `stop` returns, no tick is delivered until the
//! next `start`.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};

use super::millis_of;
use super::scheduler::TickScheduler;
use super::source::TimeSource;
use super::state::{ClockState, Direction, to_signed, to_unsigned};
use crate::error::{Error, Result};
use crate::format::{DelayMode, TimeFormatter};
use crate::pattern::{Semantic, TimeUnit};
use crate::schedule::Schedule;
use crate::subscription::{Action, CallbackRegistry};

/// Everything an engine needs, validated by a builder.
pub(crate) struct EngineParts {
    pub direction: Direction,
    pub start: u64,
    pub initial: Semantic,
    pub patterns: Schedule<Semantic>,
    pub actions: Schedule<Action>,
    pub delay_mode: DelayMode,
    pub scheduler: Arc<dyn TickScheduler>,
    pub source: Arc<dyn TimeSource>,
}

pub(crate) struct ClockEngine {
    shared: Arc<Shared>,
}

struct Shared {
    /// Held while a callback is delivered and while the state is changed.
    gate: ReentrantMutex<()>,
    inner: Mutex<Inner>,
    callbacks: CallbackRegistry,
    scheduler: Arc<dyn TickScheduler>,
    source: Arc<dyn TimeSource>,
}

struct Inner {
    direction: Direction,
    start: i64,
    initial: Semantic,
    patterns: Schedule<Semantic>,
    actions: Schedule<Action>,
    pending_patterns: Schedule<Semantic>,
    pending_actions: Schedule<Action>,
    state: ClockState,
    value: i64,
    anchor_now: u64,
    anchor_value: i64,
    formatter: TimeFormatter,
    delay_mode: DelayMode,
    drift_correction: bool,
    expected: Option<i64>,
    lead: i64,
    generation: u64,
    released: bool,
}

/// Result of one tick computed under the lock.
struct TickOutcome {
    actions: Vec<Action>,
    value: u64,
    text: String,
    finished: bool,
}

impl ClockEngine {
    pub(crate) fn new(parts: EngineParts) -> Self {
        let drift_correction = parts.delay_mode == DelayMode::Exact
            && !parts.initial.has(TimeUnit::Subsecond)
            && parts
                .patterns
                .iter()
                .all(|entry| !entry.payload.has(TimeUnit::Subsecond));
        if parts.delay_mode == DelayMode::Exact && !drift_correction {
            tracing::debug!("Drift correction disabled: a pattern shows sub-second digits");
        }

        let start = to_signed(parts.start);
        let formatter = TimeFormatter::new(parts.initial.clone());
        let mut inner = Inner {
            direction: parts.direction,
            start,
            initial: parts.initial,
            pending_patterns: Schedule::new(),
            pending_actions: Schedule::new(),
            patterns: parts.patterns,
            actions: parts.actions,
            state: ClockState::Idle,
            value: start,
            anchor_now: 0,
            anchor_value: start,
            formatter,
            delay_mode: parts.delay_mode,
            drift_correction,
            expected: None,
            lead: 0,
            generation: 0,
            released: false,
        };
        inner.rewind();

        Self {
            shared: Arc::new(Shared {
                gate: ReentrantMutex::new(()),
                inner: Mutex::new(inner),
                callbacks: CallbackRegistry::new(),
                scheduler: parts.scheduler,
                source: parts.source,
            }),
        }
    }

    pub(crate) fn callbacks(&self) -> &CallbackRegistry {
        &self.shared.callbacks
    }

    pub(crate) fn start(&self) -> Result<()> {
        let shared = &self.shared;
        let _gate = shared.gate.lock();
        let mut inner = shared.inner.lock();
        if inner.released {
            return Err(Error::Released);
        }
        match inner.state {
            ClockState::Running => return Ok(()),
            ClockState::Idle => inner.rewind(),
            ClockState::Paused => {}
        }

        inner.anchor_now = shared.source.now_millis();
        inner.anchor_value = inner.value;
        inner.state = ClockState::Running;
        inner.generation += 1;
        inner.expected = Some(inner.value);
        inner.lead = 0;
        tracing::debug!(value = inner.value, "Clock started");

        shared.arm(&inner, Duration::ZERO);
        Ok(())
    }

    pub(crate) fn stop(&self) {
        let shared = &self.shared;
        let _gate = shared.gate.lock();
        let mut inner = shared.inner.lock();
        if inner.state != ClockState::Running {
            return;
        }
        let now = shared.source.now_millis();
        inner.value = inner.position(now).max(0);
        inner.state = ClockState::Paused;
        inner.generation += 1;
        inner.expected = None;
        inner.lead = 0;
        shared.scheduler.cancel_all();
        tracing::debug!(value = inner.value, "Clock stopped");
    }

    pub(crate) fn set_time(&self, millis: u64) -> Result<()> {
        let shared = &self.shared;
        let _gate = shared.gate.lock();
        let mut inner = shared.inner.lock();
        if inner.released {
            return Err(Error::Released);
        }
        let value = to_signed(millis);
        let direction = inner.direction;

        inner.pending_patterns = inner.patterns.clone();
        inner
            .pending_patterns
            .retain(|entry| !direction.reached(entry.at, value));
        inner
            .pending_actions
            .retain(|entry| !direction.reached(entry.at, value));
        let semantic = inner.select(value).clone();
        inner.swap_formatter(semantic);
        inner.value = value;

        match inner.state {
            ClockState::Running => {
                let interval = inner.interval();
                inner.anchor_now = shared.source.now_millis();
                inner.anchor_value = value;
                inner.generation += 1;
                inner.expected = Some(direction.advance(value, to_signed(millis_of(interval))));
                inner.lead = 0;
                shared.scheduler.cancel_all();
                shared.arm(&inner, interval);
            }
            ClockState::Idle => inner.state = ClockState::Paused,
            ClockState::Paused => {}
        }
        tracing::debug!(value, state = %inner.state, "Clock time set");
        Ok(())
    }

    pub(crate) fn reset(&self) {
        let shared = &self.shared;
        let _gate = shared.gate.lock();
        let mut inner = shared.inner.lock();
        inner.generation += 1;
        shared.scheduler.cancel_all();
        inner.rewind();
        inner.state = ClockState::Idle;
        tracing::debug!("Clock reset");
    }

    pub(crate) fn release(&self) {
        let shared = &self.shared;
        let _gate = shared.gate.lock();
        {
            let mut inner = shared.inner.lock();
            inner.released = true;
            inner.generation += 1;
            inner.state = ClockState::Idle;
            inner.patterns.clear();
            inner.actions.clear();
            inner.pending_patterns.clear();
            inner.pending_actions.clear();
            shared.scheduler.cancel_all();
        }
        shared.callbacks.clear();
        tracing::debug!("Clock released");
    }

    pub(crate) fn state(&self) -> ClockState {
        self.shared.inner.lock().state
    }

    pub(crate) fn value(&self) -> u64 {
        let inner = self.shared.inner.lock();
        to_unsigned(inner.current(self.shared.source.as_ref()))
    }

    pub(crate) fn formatted(&self) -> String {
        let mut inner = self.shared.inner.lock();
        let value = to_unsigned(inner.current(self.shared.source.as_ref()));
        inner.formatter.format(value).to_string()
    }

    pub(crate) fn start_value(&self) -> u64 {
        to_unsigned(self.shared.inner.lock().start)
    }

    pub(crate) fn formatted_start(&self) -> String {
        let inner = self.shared.inner.lock();
        let mut formatter = TimeFormatter::new(inner.select(inner.start).clone());
        formatter.format(to_unsigned(inner.start)).to_string()
    }
}

impl Drop for ClockEngine {
    fn drop(&mut self) {
        let _gate = self.shared.gate.lock();
        self.shared.inner.lock().generation += 1;
        self.shared.scheduler.cancel_all();
    }
}

impl std::fmt::Debug for ClockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("ClockEngine")
            .field("direction", &inner.direction)
            .field("state", &inner.state)
            .field("value", &inner.value)
            .field("pattern", &inner.formatter.semantic().pattern())
            .finish_non_exhaustive()
    }
}

impl Shared {
    /// Queues the next tick and one firing per distinct threshold ahead.
    ///
    /// A countdown also gets a firing at zero so it finishes on time even
    /// when its tick interval is coarse.
    fn arm(self: &Arc<Self>, inner: &Inner, first_tick: Duration) {
        let generation = inner.generation;
        self.schedule_tick(first_tick, generation);

        let finish = (inner.direction == Direction::CountDown).then_some(0);
        let offsets: BTreeSet<u64> = inner
            .pending_patterns
            .iter()
            .map(|entry| entry.at)
            .chain(inner.pending_actions.iter().map(|entry| entry.at))
            .chain(finish)
            .filter_map(|at| inner.direction.distance(inner.value, at))
            .collect();
        for offset in offsets {
            let weak = Arc::downgrade(self);
            self.scheduler.schedule_once(
                Duration::from_millis(offset),
                Box::new(move || {
                    if let Some(shared) = Weak::upgrade(&weak) {
                        shared.on_threshold(generation);
                    }
                }),
            );
        }
    }

    fn schedule_tick(self: &Arc<Self>, after: Duration, generation: u64) {
        let weak = Arc::downgrade(self);
        self.scheduler.schedule_once(
            after,
            Box::new(move || {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.on_tick(generation);
                }
            }),
        );
    }

    fn on_tick(self: &Arc<Self>, generation: u64) {
        let _gate = self.gate.lock();
        let started = self.source.now_millis();
        let Some(outcome) = self.compute_tick(generation, started) else {
            return;
        };

        for action in &outcome.actions {
            action.run();
        }
        self.callbacks
            .dispatch_tick(Duration::from_millis(outcome.value), &outcome.text);
        if outcome.finished {
            self.callbacks.dispatch_finish();
            return;
        }

        let inner = self.inner.lock();
        if inner.generation != generation || inner.state != ClockState::Running {
            return;
        }
        let spent = to_signed(self.source.now_millis().saturating_sub(started));
        let interval = to_signed(millis_of(inner.interval()));
        let next = to_unsigned(interval - inner.lead - spent);
        tracing::trace!(value = outcome.value, next_ms = next, "Tick");
        self.schedule_tick(Duration::from_millis(next), generation);
    }

    fn compute_tick(&self, generation: u64, now: u64) -> Option<TickOutcome> {
        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.state != ClockState::Running {
            return None;
        }

        let actual = inner.position(now);
        let value = inner.corrected(actual);
        let (actions, _) = inner.apply_due(value);

        if inner.direction == Direction::CountDown && (value <= 0 || actual <= 0) {
            let text = inner.formatter.format(0).to_string();
            inner.rewind();
            inner.state = ClockState::Idle;
            inner.generation += 1;
            self.scheduler.cancel_all();
            tracing::debug!("Countdown finished");
            return Some(TickOutcome {
                actions,
                value: 0,
                text,
                finished: true,
            });
        }

        let shown = to_unsigned(value);
        let text = inner.formatter.format(shown).to_string();
        let interval = to_signed(millis_of(inner.interval()));
        inner.value = value;
        inner.expected = Some(inner.direction.advance(value, interval));
        Some(TickOutcome {
            actions,
            value: shown,
            text,
            finished: false,
        })
    }

    /// Applies the entries due at a threshold. A pattern swap restarts the
    /// tick sequence at once with the new interval; reaching zero finishes
    /// a countdown.
    fn on_threshold(self: &Arc<Self>, generation: u64) {
        let _gate = self.gate.lock();
        let actions = {
            let mut inner = self.inner.lock();
            if inner.generation != generation || inner.state != ClockState::Running {
                return;
            }
            let value = inner.position(self.source.now_millis());
            if inner.direction == Direction::CountDown && value <= 0 {
                drop(inner);
                self.on_tick(generation);
                return;
            }

            let (actions, swapped) = inner.apply_due(value);
            if swapped {
                inner.value = value;
                inner.generation += 1;
                inner.expected = Some(value);
                inner.lead = 0;
                self.scheduler.cancel_all();
                self.arm(&inner, Duration::ZERO);
            }
            actions
        };
        for action in &actions {
            action.run();
        }
    }
}

impl Inner {
    /// Returns to the start value with every entry pending again.
    fn rewind(&mut self) {
        let (start, direction) = (self.start, self.direction);
        self.value = start;
        self.anchor_value = start;
        self.pending_patterns = self.patterns.clone();
        self.pending_patterns
            .retain(|entry| !direction.reached(entry.at, start));
        self.pending_actions = self.actions.clone();
        let semantic = self.select(start).clone();
        self.formatter = TimeFormatter::new(semantic);
        self.expected = None;
        self.lead = 0;
    }

    /// The pattern in force at `value`: the reached entry furthest along,
    /// or the start pattern.
    fn select(&self, value: i64) -> &Semantic {
        let direction = self.direction;
        let mut reached = self
            .patterns
            .iter()
            .filter(|entry| direction.reached(entry.at, value));
        let furthest = match direction {
            Direction::CountUp => reached.last(),
            Direction::CountDown => reached.next(),
        };
        furthest.map_or(&self.initial, |entry| &entry.payload)
    }

    /// Returns `true` if the pattern actually changed.
    fn swap_formatter(&mut self, semantic: Semantic) -> bool {
        if self.formatter.semantic() == &semantic {
            return false;
        }
        tracing::trace!(pattern = semantic.pattern(), "Pattern swapped");
        self.formatter = TimeFormatter::new(semantic);
        true
    }

    /// Consumes pending entries reached at `value`. Returns the due actions
    /// and whether the pattern changed.
    fn apply_due(&mut self, value: i64) -> (Vec<Action>, bool) {
        let direction = self.direction;
        let patterns = self
            .pending_patterns
            .take_reached(|at| direction.reached(at, value));
        let furthest = match direction {
            Direction::CountUp => patterns.into_iter().last(),
            Direction::CountDown => patterns.into_iter().next(),
        };
        let swapped = furthest.is_some_and(|entry| self.swap_formatter(entry.payload));

        let actions: Vec<Action> = self
            .pending_actions
            .take_reached(|at| direction.reached(at, value))
            .into_iter()
            .map(|entry| entry.payload)
            .collect();
        if !actions.is_empty() {
            tracing::trace!(value, count = actions.len(), "Firing scheduled actions");
        }
        (actions, swapped)
    }

    fn position(&self, now: u64) -> i64 {
        let elapsed = to_signed(now.saturating_sub(self.anchor_now));
        self.direction.advance(self.anchor_value, elapsed)
    }

    fn current(&self, source: &dyn TimeSource) -> i64 {
        if self.state == ClockState::Running {
            self.position(source.now_millis()).max(0)
        } else {
            self.value
        }
    }

    /// Snaps `actual` to the expected value when drift correction is on and
    /// the two are less than one interval apart.
    fn corrected(&mut self, actual: i64) -> i64 {
        let interval = to_signed(millis_of(self.interval()));
        let reported = match self.expected {
            Some(expected) if self.drift_correction && (actual - expected).abs() < interval => {
                expected
            }
            _ => actual,
        };
        self.lead = self.direction.lead(actual, reported);
        reported
    }

    fn interval(&self) -> Duration {
        self.formatter.delay(self.delay_mode)
    }
}
