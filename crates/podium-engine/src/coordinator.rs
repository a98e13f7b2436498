//! Championship orchestration.
//!
//! [`RaceCoordinator`] runs heats one after another. Each heat gets a
//! fresh [`FinishLine`] (borrowing the persistent [`ScoreTable`]), a fresh
//! [`HeatBarrier`] for N parties, and a fresh [`HeatControl`]. N named
//! competitor threads are spawned inside a `thread::scope`, the
//! coordinator blocks on the barrier, joins every thread, and only then
//! reports the heat and moves on.
//!
//! # Ownership model
//!
//! The coordinator owns the score table. During a heat the table is
//! mutably borrowed by that heat's finish line and nothing else; the
//! borrow ends when the finish line is closed, after the barrier has
//! released and every competitor thread has been joined. Heats therefore
//! cannot overlap, and the table is never read while a crossing is
//! pending.
//!
//! # Failure
//!
//! Any competitor error, panic, or spawn failure (and a stall, if a
//! watchdog is configured) is fatal. The heat is still drained before the
//! error is returned, its points are rolled back out of the score table,
//! and the coordinator refuses to run further heats.
//!
//! Draining means every competitor thread is joined. The watchdog can
//! cut a competitor's wait short, but a [`DelaySource`] that blocks
//! inside `delay()` holds the heat until it returns.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use podium_core::{
    podium, standings, CompetitorId, DelaySource, HeatId, Podium, RaceError, ScoreTable, Standing,
};

use crate::barrier::HeatBarrier;
use crate::competitor::{CompetitorTask, Finish};
use crate::config::{ConfigError, RaceConfig};
use crate::control::HeatControl;
use crate::finish_line::{Arrival, FinishLine};
use crate::metrics::{ChampionshipMetrics, HeatMetrics};

// ── RaceObserver ────────────────────────────────────────────────

/// Hooks invoked by the coordinator thread around each heat.
///
/// Both methods default to doing nothing.
pub trait RaceObserver {
    /// Called before any competitor of `heat` is spawned. `control` may
    /// be cloned and used from other threads until the heat ends.
    fn on_heat_start(&mut self, heat: HeatId, control: &HeatControl) {
        let _ = (heat, control);
    }

    /// Called once the heat's barrier has released and every competitor
    /// has been joined.
    fn on_heat_finished(&mut self, report: &HeatReport) {
        let _ = report;
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RaceObserver for NoopObserver {}

// ── HeatReport ──────────────────────────────────────────────────

/// Outcome of one completed heat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatReport {
    /// Heat number.
    pub heat: HeatId,
    /// Arrivals in position order.
    pub arrivals: Vec<Arrival>,
    /// Competitors whose wait was cancelled, in index order.
    pub cut_short: Vec<CompetitorId>,
    /// Timing for this heat.
    pub metrics: HeatMetrics,
}

impl HeatReport {
    /// Competitors in arrival order.
    pub fn order(&self) -> Vec<CompetitorId> {
        self.arrivals.iter().map(|a| a.competitor).collect()
    }

    /// Points `competitor` earned in this heat.
    pub fn points_for(&self, competitor: CompetitorId) -> Option<u32> {
        self.arrivals
            .iter()
            .find(|a| a.competitor == competitor)
            .map(|a| a.points)
    }

    /// Total points handed out in this heat.
    pub fn points_awarded(&self) -> u64 {
        self.arrivals.iter().map(|a| u64::from(a.points)).sum()
    }
}

// ── ChampionshipResult ──────────────────────────────────────────

/// Everything a finished championship produced.
#[derive(Clone, Debug)]
pub struct ChampionshipResult {
    /// Final cumulative scores, in competitor-index order.
    pub scores: ScoreTable,
    /// One report per heat, in heat order.
    pub heats: Vec<HeatReport>,
    /// Every competitor, ranked.
    pub standings: Vec<Standing>,
    /// The top `min(3, N)` standings.
    pub podium: Podium,
    /// Aggregate timing.
    pub metrics: ChampionshipMetrics,
}

// ── RaceCoordinator ─────────────────────────────────────────────

/// Runs a championship of sequential heats.
///
/// # Example
///
/// ```ignore
/// let delays = RandomDelays::new(42, Duration::from_millis(50));
/// let result = RaceCoordinator::new(RaceConfig::new(10, 10), delays)?
///     .run(&mut NoopObserver)?;
/// println!("winner: {}", result.podium[0].name);
/// ```
pub struct RaceCoordinator<D> {
    config: RaceConfig,
    delays: D,
    table: ScoreTable,
    reports: Vec<HeatReport>,
    metrics: ChampionshipMetrics,
    halted: Option<RaceError>,
}

/// What the scoped competitor threads left behind.
struct HeatOutcome {
    finishes: Vec<Finish>,
    failures: Vec<RaceError>,
    stalled: Option<usize>,
    barrier_wait: Duration,
}

impl<D: DelaySource> RaceCoordinator<D> {
    /// Validate `config` and build a coordinator with a zeroed score table.
    pub fn new(config: RaceConfig, delays: D) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = config.score_table();
        Ok(Self {
            config,
            delays,
            table,
            reports: Vec::new(),
            metrics: ChampionshipMetrics::default(),
            halted: None,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Cumulative scores after the heats run so far.
    pub fn scores(&self) -> &ScoreTable {
        &self.table
    }

    /// Reports of the heats run so far.
    pub fn reports(&self) -> &[HeatReport] {
        &self.reports
    }

    /// Number of heats completed.
    pub fn heats_run(&self) -> u32 {
        self.reports.len() as u32
    }

    /// Heats left before the configured count is reached.
    pub fn remaining_heats(&self) -> u32 {
        self.config.heats.saturating_sub(self.heats_run())
    }

    /// Run the next heat to completion.
    ///
    /// May be called past the configured heat count; [`run`](Self::run)
    /// stops at it. After an error every later call returns that error,
    /// and the score table is left as it was before the failed heat.
    pub fn run_heat(&mut self, observer: &mut dyn RaceObserver) -> Result<&HeatReport, RaceError> {
        if let Some(err) = &self.halted {
            return Err(err.clone());
        }
        let checkpoint = self.table.clone();
        match self.execute_heat(observer) {
            Ok(report) => {
                observer.on_heat_finished(&report);
                self.reports.push(report);
                let last = self.reports.len() - 1;
                Ok(&self.reports[last])
            }
            Err(err) => {
                tracing::error!(error = %err, "championship halted");
                // Points from the failed heat never count.
                self.table = checkpoint;
                self.halted = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Run every remaining heat, then rank.
    pub fn run(mut self, observer: &mut dyn RaceObserver) -> Result<ChampionshipResult, RaceError> {
        while self.remaining_heats() > 0 {
            self.run_heat(observer)?;
        }
        Ok(self.finish())
    }

    /// Close the championship after however many heats have completed.
    ///
    /// On a halted coordinator this ranks the heats that finished before
    /// the failure.
    pub fn finish(self) -> ChampionshipResult {
        let standings = standings(&self.table);
        let podium = podium(&self.table);
        for s in &podium {
            tracing::info!(
                place = s.place,
                competitor = s.competitor.0,
                name = %s.name,
                score = s.score,
                "podium"
            );
        }
        ChampionshipResult {
            scores: self.table,
            heats: self.reports,
            standings,
            podium,
            metrics: self.metrics,
        }
    }

    fn execute_heat(&mut self, observer: &mut dyn RaceObserver) -> Result<HeatReport, RaceError> {
        let heat = HeatId(self.heats_run() + 1);
        let span = tracing::info_span!("heat", heat = heat.0);
        let _entered = span.enter();
        let started = Instant::now();
        let field = self.table.len();

        let barrier = HeatBarrier::new(field);
        let (control, cancels) = HeatControl::new(heat, field);
        observer.on_heat_start(heat, &control);
        tracing::info!(competitors = field, "heat started");

        let line = FinishLine::new(heat, &mut self.table, self.config.scoring.clone());
        let outcome = run_field(
            &line,
            &barrier,
            &control,
            cancels,
            &self.delays,
            self.config.stall_timeout,
        );
        let arrivals = line.into_arrivals()?;

        if let Some(pending) = outcome.stalled {
            return Err(RaceError::HeatStalled { heat, pending });
        }
        if let Some(first) = outcome.failures.first() {
            if outcome.failures.len() > 1 {
                tracing::error!(count = outcome.failures.len(), "multiple competitor failures");
            }
            return Err(first.clone());
        }
        debug_assert_eq!(arrivals.len(), field);

        let mut cut_short: Vec<_> = outcome
            .finishes
            .iter()
            .filter(|f| f.cut_short)
            .map(|f| f.arrival.competitor)
            .collect();
        cut_short.sort_unstable();

        let metrics = HeatMetrics {
            total_us: started.elapsed().as_micros() as u64,
            barrier_wait_us: outcome.barrier_wait.as_micros() as u64,
            cancelled_waits: cut_short.len() as u32,
        };
        self.metrics.record(&metrics);

        let report = HeatReport {
            heat,
            arrivals,
            cut_short,
            metrics,
        };
        debug_assert_eq!(
            report.points_awarded(),
            self.config.scoring.heat_total(field as u32)
        );
        tracing::info!(
            winner = report.arrivals.first().map(|a| a.competitor.0),
            cancelled = report.metrics.cancelled_waits,
            elapsed_us = report.metrics.total_us,
            "heat finished"
        );
        Ok(report)
    }
}

/// Spawn one thread per competitor, wait for the barrier, join them all.
fn run_field<D: DelaySource>(
    line: &FinishLine<'_>,
    barrier: &HeatBarrier,
    control: &HeatControl,
    cancels: Vec<Receiver<()>>,
    delays: &D,
    stall_timeout: Option<Duration>,
) -> HeatOutcome {
    let heat = line.heat();
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(cancels.len());
        let mut failures = Vec::new();

        for (i, cancel) in cancels.into_iter().enumerate() {
            let id = CompetitorId(i as u32);
            let task = CompetitorTask::new(id, delays, line, cancel, barrier.signal());
            let span = tracing::Span::current();
            let spawned = thread::Builder::new()
                .name(format!("podium-h{}-c{}", heat.0, i))
                .spawn_scoped(scope, move || span.in_scope(|| task.run()));
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                // The closure, and the task's signal with it, was dropped.
                Err(e) => {
                    tracing::error!(competitor = id.0, error = %e, "failed to spawn competitor");
                    failures.push(RaceError::SpawnFailed {
                        heat,
                        competitor: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let wait_start = Instant::now();
        let stalled = match stall_timeout {
            None => {
                barrier.wait();
                None
            }
            Some(timeout) if barrier.wait_timeout(timeout) => None,
            Some(_) => {
                let pending = barrier.remaining();
                tracing::error!(pending, "heat barrier stalled, red-flagging the heat");
                control.cancel_all();
                // Cancelled waits cross at once; a competitor still inside
                // `DelaySource::delay` is waited for.
                barrier.wait();
                Some(pending)
            }
        };
        let barrier_wait = wait_start.elapsed();

        let mut finishes = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            match handle.join() {
                Ok(Ok(finish)) => finishes.push(finish),
                Ok(Err(e)) => failures.push(e),
                Err(_) => {
                    tracing::error!(competitor = id.0, "competitor thread panicked");
                    failures.push(RaceError::CompetitorPanicked {
                        heat,
                        competitor: id,
                    });
                }
            }
        }

        HeatOutcome {
            finishes,
            failures,
            stalled,
            barrier_wait,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelays;
    use std::time::Duration;

    /// Delays in ms are multiplied by this so scheduling jitter cannot
    /// reorder arrivals.
    const SPACING: u64 = 5;

    fn spaced(delays: &[u64]) -> Vec<Duration> {
        delays
            .iter()
            .map(|ms| Duration::from_millis(ms * SPACING))
            .collect()
    }

    #[test]
    fn three_riders_one_heat() {
        let delays = FixedDelays::uniform(spaced(&[30, 10, 20]));
        let result = RaceCoordinator::new(RaceConfig::new(3, 1), delays)
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        let heat = &result.heats[0];
        assert_eq!(heat.order(), vec![CompetitorId(1), CompetitorId(2), CompetitorId(0)]);
        assert_eq!(heat.points_for(CompetitorId(1)), Some(3));
        assert_eq!(heat.points_for(CompetitorId(2)), Some(2));
        assert_eq!(heat.points_for(CompetitorId(0)), Some(1));

        let podium: Vec<_> = result
            .podium
            .iter()
            .map(|s| (s.competitor.0, s.score))
            .collect();
        assert_eq!(podium, vec![(1, 3), (2, 2), (0, 1)]);
    }

    #[test]
    fn run_heat_steps_one_at_a_time() {
        let delays = FixedDelays::default();
        let mut coordinator = RaceCoordinator::new(RaceConfig::new(4, 3), delays).unwrap();
        assert_eq!(coordinator.remaining_heats(), 3);

        let report = coordinator.run_heat(&mut NoopObserver).unwrap();
        assert_eq!(report.heat, HeatId(1));
        assert_eq!(report.points_awarded(), 10);
        assert_eq!(coordinator.heats_run(), 1);
        assert_eq!(coordinator.scores().total(), 10);

        let result = coordinator.run(&mut NoopObserver).unwrap();
        assert_eq!(result.heats.len(), 3);
        assert_eq!(result.metrics.heats_run, 3);
        assert_eq!(result.scores.total(), 30);
    }

    #[test]
    fn observer_sees_every_heat_in_order() {
        #[derive(Default)]
        struct Log(Vec<String>);
        impl RaceObserver for Log {
            fn on_heat_start(&mut self, heat: HeatId, control: &HeatControl) {
                assert_eq!(control.heat(), heat);
                self.0.push(format!("start {heat}"));
            }
            fn on_heat_finished(&mut self, report: &HeatReport) {
                self.0.push(format!("finish {}", report.heat));
            }
        }

        let mut log = Log::default();
        RaceCoordinator::new(RaceConfig::new(2, 2), FixedDelays::default())
            .unwrap()
            .run(&mut log)
            .unwrap();
        assert_eq!(log.0, vec!["start 1", "finish 1", "start 2", "finish 2"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = RaceCoordinator::new(RaceConfig::new(0, 1), FixedDelays::default())
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::NoCompetitors);
    }

    #[test]
    fn finish_after_partial_run_ranks_current_scores() {
        let delays = FixedDelays::uniform(spaced(&[20, 10]));
        let mut coordinator = RaceCoordinator::new(RaceConfig::new(2, 5), delays).unwrap();
        coordinator.run_heat(&mut NoopObserver).unwrap();
        let result = coordinator.finish();
        assert_eq!(result.heats.len(), 1);
        assert_eq!(result.podium[0].competitor, CompetitorId(1));
        assert_eq!(result.standings.len(), 2);
    }
}
