//! Championship configuration, validation, and error types.
//!
//! [`RaceConfig`] is the builder-input for a
//! [`RaceCoordinator`](crate::RaceCoordinator).
//! [`validate()`](RaceConfig::validate) checks structural invariants up
//! front so that a running championship only ever fails on coordination
//! bugs, never on bad input.

use std::time::Duration;

use podium_core::{ScoreTable, ScoringRule};
use thiserror::Error;

/// Upper bound on competitors. Each competitor is an OS thread per heat.
pub const MAX_COMPETITORS: u32 = 1024;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RaceConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Zero competitors.
    #[error("at least one competitor is required")]
    NoCompetitors,
    /// More competitors than [`MAX_COMPETITORS`].
    #[error("{configured} competitors exceeds the maximum of {max}")]
    TooManyCompetitors {
        /// The configured count.
        configured: u32,
        /// The allowed maximum.
        max: u32,
    },
    /// Zero heats.
    #[error("at least one heat is required")]
    NoHeats,
    /// `names` does not have one entry per competitor.
    #[error("{names} names given for {competitors} competitors")]
    NameCountMismatch {
        /// Configured competitor count.
        competitors: u32,
        /// Number of names supplied.
        names: usize,
    },
    /// A scoring table with no entries awards nothing.
    #[error("scoring table is empty")]
    EmptyScoringTable,
    /// A zero stall timeout would fire before any competitor could finish.
    #[error("stall_timeout must be greater than zero")]
    ZeroStallTimeout,
}

// ── RaceConfig ─────────────────────────────────────────────────────

/// Complete configuration for a championship.
#[derive(Clone, Debug)]
pub struct RaceConfig {
    /// Competitors per heat (N). Default: 10.
    pub competitors: u32,
    /// Heats in the championship (H). Default: 10.
    pub heats: u32,
    /// Display names, one per competitor. `None` = "Competitor #k".
    pub names: Option<Vec<String>>,
    /// How arrival positions become points. Default: linear.
    pub scoring: ScoringRule,
    /// If set, a heat whose barrier has not released after this long is
    /// red-flagged and fails with
    /// [`RaceError::HeatStalled`](podium_core::RaceError::HeatStalled).
    ///
    /// The red flag cancels every competitor's wait, then the heat is
    /// drained. A delay source that blocks inside
    /// [`DelaySource::delay`](podium_core::DelaySource::delay) cannot be
    /// cancelled, and the error is returned only once it comes back.
    /// Default: `None` (wait indefinitely).
    pub stall_timeout: Option<Duration>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            competitors: 10,
            heats: 10,
            names: None,
            scoring: ScoringRule::Linear,
            stall_timeout: None,
        }
    }
}

impl RaceConfig {
    /// Configuration for `competitors` competitors over `heats` heats,
    /// everything else default.
    pub fn new(competitors: u32, heats: u32) -> Self {
        Self {
            competitors,
            heats,
            ..Self::default()
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Field size.
        if self.competitors == 0 {
            return Err(ConfigError::NoCompetitors);
        }
        if self.competitors > MAX_COMPETITORS {
            return Err(ConfigError::TooManyCompetitors {
                configured: self.competitors,
                max: MAX_COMPETITORS,
            });
        }
        // 2. Heat count.
        if self.heats == 0 {
            return Err(ConfigError::NoHeats);
        }
        // 3. Names, if given, match the field.
        if let Some(names) = &self.names {
            if names.len() != self.competitors as usize {
                return Err(ConfigError::NameCountMismatch {
                    competitors: self.competitors,
                    names: names.len(),
                });
            }
        }
        // 4. Scoring table is usable.
        if let ScoringRule::Table(table) = &self.scoring {
            if table.is_empty() {
                return Err(ConfigError::EmptyScoringTable);
            }
        }
        // 5. Watchdog.
        if self.stall_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroStallTimeout);
        }
        Ok(())
    }

    /// A zeroed score table for this field.
    pub fn score_table(&self) -> ScoreTable {
        match &self.names {
            Some(names) => ScoreTable::new(names.iter().cloned()),
            None => ScoreTable::with_default_names(self.competitors),
        }
    }
}
