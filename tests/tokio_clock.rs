// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for clocks driven by the tokio runtime.
//!
//! Most tests pause time, so the runtime jumps straight to the next timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use tickmark::{ClockState, Stopwatch, Subscribable, Timer};

#[tokio::test(start_paused = true)]
async fn stopwatch_ticks_every_second() {
    let stopwatch = Stopwatch::builder()
        .start_pattern("MM:SS")
        .use_exact_delay(true)
        .build()
        .unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    stopwatch.on_tick(move |_, text| {
        let _ = tx.send(text.to_string());
    });

    stopwatch.start().unwrap();
    for expected in ["00:00", "00:01", "00:02", "00:03"] {
        assert_eq!(rx.recv().await.unwrap(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn timer_finishes_on_time() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = Timer::builder()
        .start_pattern("SS")
        .start_time(Duration::from_secs(3))
        .use_exact_delay(true)
        .on_finish(move || {
            let _ = tx.send(());
        })
        .build()
        .unwrap();

    let begin = Instant::now();
    timer.start().unwrap();
    rx.recv().await.unwrap();

    let took = begin.elapsed();
    assert!(took >= Duration::from_secs(3), "{took:?}");
    assert!(took < Duration::from_millis(3_100), "{took:?}");
    assert_eq!(timer.state(), ClockState::Idle);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_ticks() {
    let stopwatch = Stopwatch::builder()
        .start_pattern("SS")
        .use_exact_delay(true)
        .build()
        .unwrap();
    let ticks = Arc::new(AtomicU32::new(0));
    let sink = ticks.clone();
    stopwatch.on_tick(move |_, _| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    stopwatch.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    stopwatch.stop();
    let seen = ticks.load(Ordering::SeqCst);
    assert_eq!(seen, 2);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
    assert_eq!(stopwatch.current_time(), Duration::from_millis(1_500));
}

#[tokio::test(start_paused = true)]
async fn dropped_clock_stops_ticking() {
    let ticks = Arc::new(AtomicU32::new(0));
    let sink = ticks.clone();
    let stopwatch = Stopwatch::builder()
        .start_pattern("SS")
        .on_tick(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    stopwatch.start().unwrap();
    drop(stopwatch);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn action_runs_on_runtime() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = Timer::builder()
        .start_pattern("MM:SS")
        .start_time(Duration::from_secs(60))
        .action_at(Duration::from_secs(45), move || {
            let _ = tx.send(Instant::now());
        })
        .build()
        .unwrap();

    let begin = Instant::now();
    timer.start().unwrap();
    let fired_at = rx.recv().await.unwrap();
    let took = fired_at - begin;
    assert!(took >= Duration::from_secs(15), "{took:?}");
    assert!(took < Duration::from_millis(15_100), "{took:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_control_is_serialized() {
    let ticks = Arc::new(AtomicU32::new(0));
    let sink = ticks.clone();
    let stopwatch = Arc::new(
        Stopwatch::builder()
            .start_pattern("SS.LLL")
            .on_tick(move |_, _| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap(),
    );

    stopwatch.start().unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(ticks.load(Ordering::SeqCst) > 0);

    let mut workers = Vec::new();
    for worker in 0..4_u64 {
        let stopwatch = stopwatch.clone();
        workers.push(tokio::spawn(async move {
            for round in 0..50_u64 {
                match (worker + round) % 4 {
                    0 => stopwatch.start().unwrap(),
                    1 => stopwatch.stop(),
                    2 => stopwatch.set_time(Duration::from_millis(round * 10)).unwrap(),
                    _ => stopwatch.reset(),
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }));
    }
    for worker in workers {
        worker.await.unwrap();
    }

    stopwatch.start().unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    stopwatch.stop();
    let paused_at = stopwatch.current_time();
    let seen = ticks.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
    assert_eq!(stopwatch.state(), ClockState::Paused);
    assert_eq!(stopwatch.current_time(), paused_at);

    stopwatch.reset();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
    assert_eq!(stopwatch.state(), ClockState::Idle);
    assert_eq!(stopwatch.current_time(), Duration::ZERO);
}
