//! Benchmark profiles for the Podium race engine.
//!
//! Provides pre-built championship profiles for benchmarking:
//!
//! - [`reference_profile`]: the classic 10 competitors over 10 heats
//! - [`wide_profile`]: a 200-competitor field over 5 heats
//! - [`jittered_delays`]: short seeded random delays that bunch arrivals

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use podium_core::ScoreTable;
use podium_engine::{FixedDelays, RaceConfig, RandomDelays};

/// Upper bound for [`jittered_delays`].
pub const JITTER: Duration = Duration::from_micros(200);

/// 10 competitors, 10 heats, linear scoring.
pub fn reference_profile() -> RaceConfig {
    RaceConfig::new(10, 10)
}

/// 200 competitors, 5 heats, linear scoring.
///
/// Every crossing contends for the finish line with up to 199 others.
pub fn wide_profile() -> RaceConfig {
    RaceConfig::new(200, 5)
}

/// Zero delay for every competitor: heat time is pure coordination cost.
pub fn instant_delays() -> FixedDelays {
    FixedDelays::default()
}

/// Seeded delays in `[0, JITTER)`.
pub fn jittered_delays(seed: u64) -> RandomDelays {
    RandomDelays::new(seed, JITTER)
}

/// A table of `count` competitors with deterministic, tie-heavy scores.
///
/// Scores fall into `count / 4` distinct values so the ranking tie-break
/// is exercised.
pub fn tied_table(count: u32) -> ScoreTable {
    let buckets = u64::from((count / 4).max(1));
    let scores: Vec<u64> = (0..u64::from(count))
        .map(|i| i.wrapping_mul(2_654_435_761) % buckets)
        .collect();
    ScoreTable::from_scores(&scores)
}
