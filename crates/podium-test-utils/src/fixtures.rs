//! Reusable observer fixtures.
//!
//! - [`RecordingObserver`]: keeps a copy of every heat report.
//! - [`CancelAtStart`]: cancels chosen competitors' waits as each heat opens.
//! - [`RedFlagAfter`]: cancels every wait once a heat has run for a while.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use podium_core::{CompetitorId, HeatId};
use podium_engine::{HeatControl, HeatReport, RaceObserver};

/// Captures heat starts and finished reports.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<HeatId>,
    pub reports: Vec<HeatReport>,
}

impl RaceObserver for RecordingObserver {
    fn on_heat_start(&mut self, heat: HeatId, _control: &HeatControl) {
        self.started.push(heat);
    }

    fn on_heat_finished(&mut self, report: &HeatReport) {
        self.reports.push(report.clone());
    }
}

/// Cancels `targets` in every heat (or only in `heats`, if non-empty)
/// before any competitor has started waiting.
#[derive(Debug, Default)]
pub struct CancelAtStart {
    pub targets: Vec<CompetitorId>,
    pub heats: Vec<HeatId>,
}

impl CancelAtStart {
    pub fn new(targets: Vec<CompetitorId>) -> Self {
        Self {
            targets,
            heats: Vec::new(),
        }
    }

    /// Restrict cancellation to the listed heats.
    pub fn in_heats(mut self, heats: Vec<HeatId>) -> Self {
        self.heats = heats;
        self
    }
}

impl RaceObserver for CancelAtStart {
    fn on_heat_start(&mut self, heat: HeatId, control: &HeatControl) {
        if !self.heats.is_empty() && !self.heats.contains(&heat) {
            return;
        }
        for &target in &self.targets {
            control.cancel(target);
        }
    }
}

/// Spawns a steward thread per heat that waves the red flag after `after`.
///
/// The steward for a heat is joined when that heat finishes.
#[derive(Debug)]
pub struct RedFlagAfter {
    pub after: Duration,
    steward: Option<JoinHandle<()>>,
}

impl RedFlagAfter {
    pub fn new(after: Duration) -> Self {
        Self {
            after,
            steward: None,
        }
    }
}

impl RaceObserver for RedFlagAfter {
    fn on_heat_start(&mut self, _heat: HeatId, control: &HeatControl) {
        let control = control.clone();
        let after = self.after;
        self.steward = Some(thread::spawn(move || {
            thread::sleep(after);
            control.cancel_all();
        }));
    }

    fn on_heat_finished(&mut self, _report: &HeatReport) {
        if let Some(steward) = self.steward.take() {
            steward.join().unwrap();
        }
    }
}
