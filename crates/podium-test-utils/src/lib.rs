//! Test utilities and mock types for Podium development.
//!
//! Provides mock [`DelaySource`] implementations that record or script
//! their answers, and (in [`fixtures`]) observers that cancel waits or
//! capture heat reports.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use podium_core::{CompetitorId, DelaySource, HeatId};
use podium_engine::FixedDelays;

/// Wraps a delay source and records every `(heat, competitor)` query.
///
/// Lets tests check that each competitor raced exactly once per heat.
pub struct RecordingDelays<D> {
    inner: D,
    calls: Mutex<Vec<(HeatId, CompetitorId)>>,
}

impl<D: DelaySource> RecordingDelays<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every query so far, in call order.
    pub fn calls(&self) -> Vec<(HeatId, CompetitorId)> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times each `(heat, competitor)` pair was queried.
    pub fn call_counts(&self) -> HashMap<(HeatId, CompetitorId), usize> {
        let mut counts = HashMap::new();
        for call in self.calls() {
            *counts.entry(call).or_insert(0) += 1;
        }
        counts
    }
}

impl<D: DelaySource> DelaySource for RecordingDelays<D> {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        self.calls.lock().unwrap().push((heat, competitor));
        self.inner.delay(heat, competitor)
    }
}

/// Zero delay for everyone except `stalled`, who would wait `stall`.
///
/// Pair with a cancelling observer to exercise the red-flag path
/// without a test actually sleeping for `stall`.
pub struct StallingDelays {
    pub stalled: Vec<CompetitorId>,
    pub stall: Duration,
}

impl StallingDelays {
    pub fn new(stalled: Vec<CompetitorId>, stall: Duration) -> Self {
        Self { stalled, stall }
    }
}

impl DelaySource for StallingDelays {
    fn delay(&self, _heat: HeatId, competitor: CompetitorId) -> Duration {
        if self.stalled.contains(&competitor) {
            self.stall
        } else {
            Duration::ZERO
        }
    }
}

/// Delays that finish competitors in the given index order, `spacing`
/// apart. `order[0]` arrives first.
pub fn delays_for_order(order: &[u32], spacing: Duration) -> Vec<Duration> {
    let mut delays = vec![Duration::ZERO; order.len()];
    for (rank, &competitor) in order.iter().enumerate() {
        delays[competitor as usize] = spacing * (rank as u32 + 1);
    }
    delays
}

/// Two heats where the second reverses the first's arrival order.
pub fn reversed_heats(first_order: &[u32], spacing: Duration) -> FixedDelays {
    let reversed: Vec<u32> = first_order.iter().rev().copied().collect();
    FixedDelays::per_heat(vec![
        delays_for_order(first_order, spacing),
        delays_for_order(&reversed, spacing),
    ])
}
