//! One competitor's run through a heat.
//!
//! The task walks `Pending → Waiting → Crossing → Done`:
//!
//! 1. **Pending → Waiting** when its thread starts.
//! 2. **Waiting → Crossing** when the delay elapses, or earlier if the
//!    wait is cancelled through [`HeatControl`](crate::HeatControl).
//! 3. **Crossing → Done** once [`FinishLine::cross`] returns.
//!
//! The task owns its [`BarrierSignal`], which arrives when the task is
//! dropped, on success and failure alike.

use crossbeam_channel::{Receiver, RecvTimeoutError};
use podium_core::{CompetitorId, DelaySource, HeatId, RaceError};

use crate::barrier::BarrierSignal;
use crate::finish_line::{Arrival, FinishLine};

/// Lifecycle of a competitor within one heat. Transitions only move
/// forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompetitorState {
    /// Spawned, not yet racing.
    Pending,
    /// Racing toward the line.
    Waiting,
    /// Inside the finish-line critical section.
    Crossing,
    /// Crossed and scored.
    Done,
}

/// Outcome of one competitor's heat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finish {
    /// The recorded arrival.
    pub arrival: Arrival,
    /// Whether the wait was cancelled before the delay elapsed.
    pub cut_short: bool,
}

pub(crate) struct CompetitorTask<'h, 't, D: ?Sized> {
    id: CompetitorId,
    heat: HeatId,
    state: CompetitorState,
    delays: &'h D,
    line: &'h FinishLine<'t>,
    cancel: Receiver<()>,
    // Arrives when the task drops.
    _signal: BarrierSignal<'h>,
}

impl<'h, 't, D: DelaySource + ?Sized> CompetitorTask<'h, 't, D> {
    pub(crate) fn new(
        id: CompetitorId,
        delays: &'h D,
        line: &'h FinishLine<'t>,
        cancel: Receiver<()>,
        signal: BarrierSignal<'h>,
    ) -> Self {
        Self {
            id,
            heat: line.heat(),
            state: CompetitorState::Pending,
            delays,
            line,
            cancel,
            _signal: signal,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> CompetitorState {
        self.state
    }

    /// Race, cross, and report.
    pub(crate) fn run(mut self) -> Result<Finish, RaceError> {
        self.transition(CompetitorState::Waiting);
        let cut_short = self.race();

        self.transition(CompetitorState::Crossing);
        let arrival = self.line.cross(self.id).inspect_err(|e| {
            tracing::error!(heat = self.heat.0, competitor = self.id.0, error = %e, "crossing rejected");
        })?;
        tracing::debug!(
            heat = self.heat.0,
            competitor = self.id.0,
            position = arrival.position,
            points = arrival.points,
            total = arrival.total,
            "crossed the finish line"
        );

        self.transition(CompetitorState::Done);
        Ok(Finish { arrival, cut_short })
    }

    /// Wait out the delay. Returns `true` if cancelled first.
    fn race(&self) -> bool {
        let delay = self.delays.delay(self.heat, self.id);
        match self.cancel.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => false,
            // The control going away mid-heat counts as a red flag too.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!(
                    heat = self.heat.0,
                    competitor = self.id.0,
                    delay_ms = delay.as_millis() as u64,
                    "wait cancelled, crossing early"
                );
                true
            }
        }
    }

    fn transition(&mut self, next: CompetitorState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        tracing::trace!(heat = self.heat.0, competitor = self.id.0, from = ?self.state, to = ?next, "state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barrier::HeatBarrier;
    use crate::delay::FixedDelays;
    use podium_core::{ScoreTable, ScoringRule};
    use std::time::{Duration, Instant};

    #[test]
    fn task_starts_pending() {
        let mut table = ScoreTable::with_default_names(1);
        let line = FinishLine::new(HeatId(1), &mut table, ScoringRule::Linear);
        let barrier = HeatBarrier::new(1);
        let delays = FixedDelays::default();
        let (_tx, rx) = crossbeam_channel::bounded(1);
        let task = CompetitorTask::new(CompetitorId(0), &delays, &line, rx, barrier.signal());
        assert_eq!(task.state(), CompetitorState::Pending);
        drop(task);
        assert!(barrier.is_released());
    }

    #[test]
    fn run_crosses_and_signals() {
        let mut table = ScoreTable::with_default_names(1);
        let line = FinishLine::new(HeatId(1), &mut table, ScoringRule::Linear);
        let barrier = HeatBarrier::new(1);
        let delays = FixedDelays::from_millis(&[5]);
        let (_tx, rx) = crossbeam_channel::bounded(1);

        let task = CompetitorTask::new(CompetitorId(0), &delays, &line, rx, barrier.signal());
        let finish = task.run().unwrap();
        assert_eq!(finish.arrival.position, 1);
        assert_eq!(finish.arrival.points, 1);
        assert!(!finish.cut_short);
        assert!(barrier.is_released());
    }

    #[test]
    fn cancelled_wait_still_crosses() {
        let mut table = ScoreTable::with_default_names(1);
        let line = FinishLine::new(HeatId(1), &mut table, ScoringRule::Linear);
        let barrier = HeatBarrier::new(1);
        let delays = FixedDelays::from_millis(&[60_000]);
        let (tx, rx) = crossbeam_channel::bounded(1);
        tx.send(()).unwrap();

        let start = Instant::now();
        let task = CompetitorTask::new(CompetitorId(0), &delays, &line, rx, barrier.signal());
        let finish = task.run().unwrap();
        assert!(finish.cut_short);
        assert!(start.elapsed() < Duration::from_secs(10));
        assert!(barrier.is_released());
        assert_eq!(line.arrived(), Ok(1));
    }

    #[test]
    fn rejected_crossing_still_signals() {
        let mut table = ScoreTable::with_default_names(1);
        let line = FinishLine::new(HeatId(3), &mut table, ScoringRule::Linear);
        line.cross(CompetitorId(0)).unwrap();
        let barrier = HeatBarrier::new(1);
        let delays = FixedDelays::default();
        let (_tx, rx) = crossbeam_channel::bounded(1);

        let task = CompetitorTask::new(CompetitorId(0), &delays, &line, rx, barrier.signal());
        let err = task.run().unwrap_err();
        assert!(matches!(err, RaceError::ArrivalOverflow { .. }));
        assert!(barrier.is_released());
    }
}
