//! Heat coordination engine for Podium championships.
//!
//! Provides the top-level [`RaceCoordinator`] that runs heats of
//! concurrent competitor threads against a shared [`FinishLine`],
//! synchronizes each heat's end on a [`HeatBarrier`], and accumulates
//! points into a persistent score table.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod competitor;
pub mod config;
pub mod control;
pub mod coordinator;
pub mod delay;
pub mod finish_line;
pub mod metrics;

pub use barrier::{BarrierSignal, HeatBarrier};
pub use competitor::{CompetitorState, Finish};
pub use config::{ConfigError, RaceConfig, MAX_COMPETITORS};
pub use control::HeatControl;
pub use coordinator::{ChampionshipResult, HeatReport, NoopObserver, RaceCoordinator, RaceObserver};
pub use delay::{FixedDelays, RandomDelays, DEFAULT_MAX_DELAY};
pub use finish_line::{Arrival, FinishLine};
pub use metrics::{ChampionshipMetrics, HeatMetrics};
