//! Error types for the Podium race engine.
//!
//! Every variant here is fatal to the championship: they signal a broken
//! coordination protocol, not a recoverable runtime condition. A
//! cancelled wait is never an error; the competitor simply crosses early.

use thiserror::Error;

use crate::id::{CompetitorId, HeatId};

/// Errors raised while running heats.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RaceError {
    /// The finish line was crossed more times than the heat has
    /// competitors. Scores are left untouched.
    #[error("heat {heat}: competitor {competitor} crossed after all {capacity} positions were assigned")]
    ArrivalOverflow {
        /// Heat in which the overflow happened.
        heat: HeatId,
        /// Competitor whose crossing was rejected.
        competitor: CompetitorId,
        /// Number of arrival positions the heat owns.
        capacity: usize,
    },
    /// A competitor crossed the finish line twice in one heat.
    #[error("heat {heat}: competitor {competitor} crossed the finish line twice")]
    DuplicateArrival {
        /// Heat in which the duplicate happened.
        heat: HeatId,
        /// Competitor that crossed twice.
        competitor: CompetitorId,
    },
    /// A competitor ID that is not present in the score table.
    #[error("competitor {competitor} is not registered in the score table")]
    UnknownCompetitor {
        /// The unregistered ID.
        competitor: CompetitorId,
    },
    /// The finish-line lock was poisoned by a panicking competitor.
    #[error("heat {heat}: finish line lock poisoned")]
    FinishLinePoisoned {
        /// Heat whose finish line is poisoned.
        heat: HeatId,
    },
    /// A competitor thread panicked before completing its heat.
    #[error("heat {heat}: competitor {competitor} panicked")]
    CompetitorPanicked {
        /// Heat in which the panic happened.
        heat: HeatId,
        /// Competitor whose thread panicked.
        competitor: CompetitorId,
    },
    /// The OS refused to spawn a competitor thread.
    #[error("heat {heat}: could not spawn competitor {competitor}: {reason}")]
    SpawnFailed {
        /// Heat being started.
        heat: HeatId,
        /// Competitor that never started.
        competitor: CompetitorId,
        /// Description of the OS error.
        reason: String,
    },
    /// The heat barrier did not release within the configured stall
    /// timeout.
    #[error("heat {heat}: barrier stalled with {pending} competitor(s) still running")]
    HeatStalled {
        /// Heat that stalled.
        heat: HeatId,
        /// Competitors that had not signalled when the watchdog fired.
        pending: usize,
    },
}
