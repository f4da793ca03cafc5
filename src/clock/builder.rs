// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builders for [`Stopwatch`] and [`Timer`].

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use super::engine::{ClockEngine, EngineParts};
use super::millis_of;
use super::scheduler::{TickScheduler, TokioScheduler};
use super::source::{MonotonicSource, TimeSource};
use super::state::Direction;
use super::{Stopwatch, Timer};
use crate::config::ClockConfig;
use crate::error::{ConfigError, Result};
use crate::format::DelayMode;
use crate::pattern::{Analyzer, Symbols};
use crate::schedule::Schedule;
use crate::subscription::Action;

type TickListener = Box<dyn Fn(Duration, &str) + Send + Sync>;
type FinishListener = Box<dyn Fn() + Send + Sync>;

/// Builder for a [`Stopwatch`].
pub type StopwatchBuilder = ClockBuilder<Stopwatch>;

/// Builder for a [`Timer`].
pub type TimerBuilder = ClockBuilder<Timer>;

/// Collects the configuration of a clock of kind `C`.
///
/// Every pattern is analyzed once, when [`build`](ClockBuilder::build) is
/// called. Scheduled entries sharing a threshold keep the first one added.
///
/// Without an explicit [`scheduler`](Self::scheduler) the clock is driven by
/// a [`TokioScheduler`] on the current runtime.
pub struct ClockBuilder<C> {
    symbols: Symbols,
    start_pattern: Option<String>,
    start_time: Option<Duration>,
    pattern_changes: Vec<(u64, String)>,
    actions: Vec<(u64, Action)>,
    tick_listeners: Vec<TickListener>,
    finish_listeners: Vec<FinishListener>,
    delay_mode: DelayMode,
    scheduler: Option<Arc<dyn TickScheduler>>,
    time_source: Option<Arc<dyn TimeSource>>,
    _clock: PhantomData<fn() -> C>,
}

impl<C> ClockBuilder<C> {
    pub(crate) fn new() -> Self {
        Self {
            symbols: Symbols::default(),
            start_pattern: None,
            start_time: None,
            pattern_changes: Vec::new(),
            actions: Vec::new(),
            tick_listeners: Vec::new(),
            finish_listeners: Vec::new(),
            delay_mode: DelayMode::default(),
            scheduler: None,
            time_source: None,
            _clock: PhantomData,
        }
    }

    /// Creates a builder seeded from `config`.
    #[must_use]
    pub fn from_config(config: &ClockConfig) -> Self {
        let mut builder = Self::new()
            .symbols(config.symbols)
            .start_pattern(config.pattern.clone())
            .delay_mode(config.delay_mode);
        if let Some(start) = config.start_time() {
            builder = builder.start_time(start);
        }
        for change in &config.pattern_changes {
            builder = builder.change_pattern_at(
                Duration::from_millis(change.at_millis),
                change.pattern.clone(),
            );
        }
        builder
    }

    /// Sets the symbols used by every pattern of this clock.
    #[must_use]
    pub fn symbols(mut self, symbols: Symbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Sets the pattern shown from the start value.
    #[must_use]
    pub fn start_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.start_pattern = Some(pattern.into());
        self
    }

    /// Sets the start value.
    #[must_use]
    pub fn start_time(mut self, time: Duration) -> Self {
        self.start_time = Some(time);
        self
    }

    /// Swaps to `pattern` once the clock value reaches `at`.
    #[must_use]
    pub fn change_pattern_at(mut self, at: Duration, pattern: impl Into<String>) -> Self {
        self.pattern_changes.push((millis_of(at), pattern.into()));
        self
    }

    /// Runs `action` once per run when the clock value reaches `at`.
    #[must_use]
    pub fn action_at<F>(mut self, at: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.push((millis_of(at), Action::new(action)));
        self
    }

    /// Registers a tick listener.
    #[must_use]
    pub fn on_tick<F>(mut self, listener: F) -> Self
    where
        F: Fn(Duration, &str) + Send + Sync + 'static,
    {
        self.tick_listeners.push(Box::new(listener));
        self
    }

    /// Sets the tick interval policy (default: [`DelayMode::BestEffort`]).
    #[must_use]
    pub fn delay_mode(mut self, mode: DelayMode) -> Self {
        self.delay_mode = mode;
        self
    }

    /// Shorthand for choosing between [`DelayMode::Exact`] and
    /// [`DelayMode::BestEffort`].
    #[must_use]
    pub fn use_exact_delay(self, exact: bool) -> Self {
        self.delay_mode(if exact {
            DelayMode::Exact
        } else {
            DelayMode::BestEffort
        })
    }

    /// Drives the clock with `scheduler`.
    ///
    /// If the scheduler has its own time source, such as a
    /// [`ManualScheduler`](super::ManualScheduler), the clock reads it unless
    /// [`time_source`](Self::time_source) is also set.
    #[must_use]
    pub fn scheduler(mut self, scheduler: impl TickScheduler + 'static) -> Self {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }

    /// Reads time from `source`.
    #[must_use]
    pub fn time_source(mut self, source: impl TimeSource + 'static) -> Self {
        self.time_source = Some(Arc::new(source));
        self
    }

    fn into_engine(self, direction: Direction, start: u64) -> Result<ClockEngine> {
        let analyzer = Analyzer::new(self.symbols);
        let pattern = self
            .start_pattern
            .ok_or(ConfigError::MissingStartPattern)?;
        let initial = analyzer.analyze(&pattern)?;

        let mut patterns = Schedule::new();
        for (at, pattern) in self.pattern_changes {
            let semantic = analyzer.analyze(&pattern)?;
            if !patterns.insert(at, semantic) {
                tracing::debug!(at_ms = at, pattern = %pattern, "Duplicate pattern change dropped");
            }
        }

        let mut actions = Schedule::new();
        for (at, action) in self.actions {
            if !actions.insert(at, action) {
                tracing::debug!(at_ms = at, "Duplicate scheduled action dropped");
            }
        }

        let scheduler: Arc<dyn TickScheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::try_current()?),
        };
        let source = self
            .time_source
            .or_else(|| scheduler.time_source())
            .unwrap_or_else(|| Arc::new(MonotonicSource::new()));

        let engine = ClockEngine::new(EngineParts {
            direction,
            start,
            initial,
            patterns,
            actions,
            delay_mode: self.delay_mode,
            scheduler,
            source,
        });
        for listener in self.tick_listeners {
            engine.callbacks().on_tick(listener);
        }
        for listener in self.finish_listeners {
            engine.callbacks().on_finish(listener);
        }

        tracing::debug!(?direction, start_ms = start, pattern = %pattern, "Clock built");
        Ok(engine)
    }
}

impl ClockBuilder<Stopwatch> {
    /// Builds the stopwatch. The start time defaults to zero.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No start pattern was set
    /// - A pattern is rejected by the analyzer
    /// - No scheduler was set and no tokio runtime is running
    pub fn build(self) -> Result<Stopwatch> {
        let start = self.start_time.map_or(0, millis_of);
        let engine = self.into_engine(Direction::CountUp, start)?;
        Ok(Stopwatch::from_engine(engine))
    }
}

impl ClockBuilder<Timer> {
    /// Registers a listener for the end of the countdown.
    #[must_use]
    pub fn on_finish<F>(mut self, listener: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.finish_listeners.push(Box::new(listener));
        self
    }

    /// Builds the timer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No start pattern or no start time was set
    /// - A pattern is rejected by the analyzer
    /// - No scheduler was set and no tokio runtime is running
    pub fn build(self) -> Result<Timer> {
        let start = self
            .start_time
            .map(millis_of)
            .ok_or(ConfigError::MissingStartTime)?;
        let engine = self.into_engine(Direction::CountDown, start)?;
        Ok(Timer::from_engine(engine))
    }
}

impl<C> std::fmt::Debug for ClockBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockBuilder")
            .field("start_pattern", &self.start_pattern)
            .field("start_time", &self.start_time)
            .field("pattern_changes", &self.pattern_changes)
            .field("actions", &self.actions.len())
            .field("delay_mode", &self.delay_mode)
            .finish_non_exhaustive()
    }
}
