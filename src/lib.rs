// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tickmark - pattern-driven duration formatting and clocks.
//!
//! This library renders millisecond values as text through a small pattern
//! language, and drives stopwatches and countdown timers that re-render that
//! text on every tick.
//!
//! # Features
//!
//! - **Patterns**: `HH:MM:SS.LL` style templates with any literal text, an
//!   escape symbol and configurable unit symbols
//! - **Formatting**: zero-padded fields, totals when coarser units are
//!   absent, an overflowing leading field
//! - **Clocks**: [`Stopwatch`] and [`Timer`] with pause/resume, jumps,
//!   scheduled pattern swaps and scheduled actions
//! - **Exact ticking**: one tick per displayed step with jitter correction
//!
//! # Quick Start
//!
//! ## One-shot formatting
//!
//! ```
//! let text = tickmark::format::format("HH:MM:SS", 3_723_000).unwrap();
//! assert_eq!(text, "01:02:03");
//!
//! // Without hours, minutes are a running total
//! assert_eq!(tickmark::format::format("MM:SS", 3_723_000).unwrap(), "62:03");
//!
//! // '#' escapes a unit symbol
//! assert_eq!(tickmark::format::format("SS#S", 7_000).unwrap(), "07S");
//! ```
//!
//! ## Countdown on tokio
//!
//! ```no_run
//! use std::time::Duration;
//! use tickmark::{Subscribable, Timer};
//!
//! #[tokio::main]
//! async fn main() -> tickmark::Result<()> {
//!     let timer = Timer::builder()
//!         .start_pattern("MM:SS")
//!         .start_time(Duration::from_secs(90))
//!         .change_pattern_at(Duration::from_secs(10), "SS.LL")
//!         .use_exact_delay(true)
//!         .on_finish(|| println!("Time is up"))
//!         .build()?;
//!
//!     timer.on_tick(|_, text| println!("{text}"));
//!     timer.start()?;
//!
//!     tokio::time::sleep(Duration::from_secs(91)).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Deterministic driving
//!
//! ```
//! use std::time::Duration;
//! use tickmark::Stopwatch;
//! use tickmark::clock::ManualScheduler;
//!
//! let scheduler = ManualScheduler::new();
//! let stopwatch = Stopwatch::builder()
//!     .start_pattern("SS.LL")
//!     .scheduler(scheduler.clone())
//!     .build()
//!     .unwrap();
//!
//! stopwatch.start().unwrap();
//! scheduler.advance(Duration::from_millis(12_340));
//! assert_eq!(stopwatch.current_formatted_time(), "12.34");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod pattern;
pub mod schedule;
pub mod subscription;

pub use clock::{ClockState, Stopwatch, StopwatchBuilder, Timer, TimerBuilder};
pub use config::ClockConfig;
pub use error::{ConfigError, Error, PatternError, Result};
pub use format::{DelayMode, TimeFormatter};
pub use pattern::{Analyzer, Semantic, Symbols, TimeUnit};
pub use subscription::{Subscribable, SubscriptionId};
