//! Delay sources: how long each competitor takes to reach the line.
//!
//! [`RandomDelays`] is the production source. It respects the determinism
//! contract: every `(heat, competitor)` pair gets its own ChaCha8 RNG
//! seeded from `seed XOR heat XOR competitor`, so a championship replayed
//! with the same seed draws the same delays regardless of thread
//! scheduling. [`FixedDelays`] returns preset durations and is what tests
//! inject when they need a known arrival order.

use std::time::Duration;

use podium_core::{CompetitorId, DelaySource, HeatId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default upper bound for [`RandomDelays`]: one second.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(1000);

/// Uniformly random delays in `[0, max_delay)`, reproducible by seed.
#[derive(Clone, Debug)]
pub struct RandomDelays {
    seed: u64,
    max_delay: Duration,
}

impl RandomDelays {
    /// Create a source drawing from `[0, max_delay)`.
    ///
    /// A zero `max_delay` makes every competitor leave immediately.
    pub fn new(seed: u64, max_delay: Duration) -> Self {
        Self { seed, max_delay }
    }

    /// The seed this source was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Exclusive upper bound on generated delays.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    fn rng_for(&self, heat: HeatId, competitor: CompetitorId) -> ChaCha8Rng {
        let key = self.seed ^ (u64::from(heat.0) << 32) ^ u64::from(competitor.0);
        ChaCha8Rng::seed_from_u64(key)
    }
}

impl Default for RandomDelays {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_DELAY)
    }
}

impl DelaySource for RandomDelays {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        let max_nanos = u64::try_from(self.max_delay.as_nanos()).unwrap_or(u64::MAX);
        if max_nanos == 0 {
            return Duration::ZERO;
        }
        let mut rng = self.rng_for(heat, competitor);
        Duration::from_nanos(rng.random_range(0..max_nanos))
    }
}

/// Preset delays, one row of per-competitor durations per heat.
///
/// Heat `h` reads row `(h - 1) % rows`, so a single row repeats for every
/// heat. Competitors missing from a row leave immediately.
#[derive(Clone, Debug, Default)]
pub struct FixedDelays {
    rows: Vec<Vec<Duration>>,
}

impl FixedDelays {
    /// The same delays for every heat.
    pub fn uniform(delays: Vec<Duration>) -> Self {
        Self { rows: vec![delays] }
    }

    /// One row of delays per heat, cycling when heats outnumber rows.
    pub fn per_heat(rows: Vec<Vec<Duration>>) -> Self {
        Self { rows }
    }

    /// [`uniform`](Self::uniform) from milliseconds.
    pub fn from_millis(delays: &[u64]) -> Self {
        Self::uniform(delays.iter().copied().map(Duration::from_millis).collect())
    }

    /// [`per_heat`](Self::per_heat) from milliseconds.
    pub fn per_heat_millis(rows: &[&[u64]]) -> Self {
        Self::per_heat(
            rows.iter()
                .map(|row| row.iter().copied().map(Duration::from_millis).collect())
                .collect(),
        )
    }
}

impl DelaySource for FixedDelays {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        if self.rows.is_empty() {
            return Duration::ZERO;
        }
        let row = heat.0.saturating_sub(1) as usize % self.rows.len();
        self.rows[row]
            .get(competitor.index())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_delays_are_reproducible() {
        let a = RandomDelays::new(42, Duration::from_millis(500));
        let b = RandomDelays::new(42, Duration::from_millis(500));
        for h in 1..=5 {
            for c in 0..10 {
                assert_eq!(
                    a.delay(HeatId(h), CompetitorId(c)),
                    b.delay(HeatId(h), CompetitorId(c))
                );
            }
        }
    }

    #[test]
    fn random_delays_stay_below_max() {
        let max = Duration::from_millis(20);
        let source = RandomDelays::new(7, max);
        for h in 1..=20 {
            for c in 0..20 {
                assert!(source.delay(HeatId(h), CompetitorId(c)) < max);
            }
        }
    }

    #[test]
    fn random_delays_vary_across_pairs() {
        let source = RandomDelays::new(9, Duration::from_secs(1));
        let first = source.delay(HeatId(1), CompetitorId(0));
        let differs = (0..10)
            .flat_map(|c| (1..=3).map(move |h| (h, c)))
            .any(|(h, c)| source.delay(HeatId(h), CompetitorId(c)) != first);
        assert!(differs);
    }

    #[test]
    fn zero_max_delay_is_instant() {
        let source = RandomDelays::new(1, Duration::ZERO);
        assert_eq!(source.delay(HeatId(1), CompetitorId(3)), Duration::ZERO);
    }

    #[test]
    fn fixed_delays_cycle_rows() {
        let source = FixedDelays::per_heat_millis(&[&[30, 10], &[5, 50]]);
        assert_eq!(source.delay(HeatId(1), CompetitorId(0)), Duration::from_millis(30));
        assert_eq!(source.delay(HeatId(2), CompetitorId(1)), Duration::from_millis(50));
        assert_eq!(source.delay(HeatId(3), CompetitorId(1)), Duration::from_millis(10));
        assert_eq!(source.delay(HeatId(1), CompetitorId(7)), Duration::ZERO);
    }

    #[test]
    fn empty_fixed_delays_are_instant() {
        let source = FixedDelays::default();
        assert_eq!(source.delay(HeatId(4), CompetitorId(0)), Duration::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn random_delay_is_bounded_and_stable(
                seed in any::<u64>(),
                max_ms in 1u64..5_000,
                heat in 1u32..1_000,
                competitor in 0u32..1_024,
            ) {
                let max = Duration::from_millis(max_ms);
                let source = RandomDelays::new(seed, max);
                let d = source.delay(HeatId(heat), CompetitorId(competitor));
                prop_assert!(d < max);
                prop_assert_eq!(d, source.clone().delay(HeatId(heat), CompetitorId(competitor)));
            }
        }
    }
}
