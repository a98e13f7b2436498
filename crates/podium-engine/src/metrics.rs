//! Per-heat and per-championship timing metrics.
//!
//! [`HeatMetrics`] captures one heat; [`ChampionshipMetrics`] folds them
//! together as heats complete.

/// Timing data collected during a single heat.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeatMetrics {
    /// Wall-clock time from heat start to report, in microseconds.
    pub total_us: u64,
    /// Time the coordinator spent blocked on the heat barrier, in microseconds.
    pub barrier_wait_us: u64,
    /// Competitors whose wait was cancelled before its delay elapsed.
    pub cancelled_waits: u32,
}

/// Aggregate metrics across every heat run so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChampionshipMetrics {
    /// Heats completed.
    pub heats_run: u32,
    /// Sum of per-heat wall-clock time, in microseconds.
    pub total_us: u64,
    /// Longest single heat, in microseconds.
    pub slowest_heat_us: u64,
    /// Cumulative cancelled waits.
    pub cancelled_waits: u64,
}

impl ChampionshipMetrics {
    /// Fold one completed heat into the totals.
    pub fn record(&mut self, heat: &HeatMetrics) {
        self.heats_run += 1;
        self.total_us += heat.total_us;
        self.slowest_heat_us = self.slowest_heat_us.max(heat.total_us);
        self.cancelled_waits += u64::from(heat.cancelled_waits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = ChampionshipMetrics::default();
        assert_eq!(m.heats_run, 0);
        assert_eq!(m.total_us, 0);
        assert_eq!(m.slowest_heat_us, 0);
        assert_eq!(m.cancelled_waits, 0);
        assert_eq!(HeatMetrics::default().barrier_wait_us, 0);
    }

    #[test]
    fn record_accumulates() {
        let mut m = ChampionshipMetrics::default();
        m.record(&HeatMetrics {
            total_us: 100,
            barrier_wait_us: 80,
            cancelled_waits: 1,
        });
        m.record(&HeatMetrics {
            total_us: 250,
            barrier_wait_us: 200,
            cancelled_waits: 0,
        });
        m.record(&HeatMetrics {
            total_us: 50,
            barrier_wait_us: 40,
            cancelled_waits: 2,
        });
        assert_eq!(m.heats_run, 3);
        assert_eq!(m.total_us, 400);
        assert_eq!(m.slowest_heat_us, 250);
        assert_eq!(m.cancelled_waits, 3);
    }
}
