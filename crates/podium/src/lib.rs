//! Podium: a racing championship engine built on concurrent competitor threads.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! Podium sub-crates. For most users, adding `podium` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use podium::prelude::*;
//!
//! // Three riders, two heats, nobody waits before crossing.
//! let coordinator = RaceCoordinator::new(RaceConfig::new(3, 2), FixedDelays::default()).unwrap();
//! let result = coordinator.run(&mut NoopObserver).unwrap();
//!
//! // Each heat hands out 3 + 2 + 1 points.
//! assert_eq!(result.scores.total(), 12);
//! assert_eq!(result.podium.len(), PODIUM_SIZE);
//! assert!(result.podium[0].score >= result.podium[1].score);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `podium-core` | IDs, score table, scoring rules, ranking, errors |
//! | [`engine`] | `podium-engine` | Coordinator, finish line, heat barrier, delay sources |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`podium-core`).
///
/// Contains the [`types::ScoreTable`], the [`types::ScoringRule`], the pure
/// ranking functions ([`types::standings`], [`types::podium`]) and the
/// [`types::DelaySource`] trait.
pub use podium_core as types;

/// Heat coordination (`podium-engine`).
///
/// [`engine::RaceCoordinator`] drives the championship heat by heat;
/// [`engine::FinishLine`] and [`engine::HeatBarrier`] are the two
/// synchronization points each heat is built from.
pub use podium_engine as engine;

/// Common imports for typical Podium usage.
///
/// ```rust
/// use podium::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use podium_core::{
        podium, standings, CompetitorId, DelaySource, HeatId, Podium, ScoreTable, ScoringRule,
        Standing, PODIUM_SIZE,
    };

    // Errors
    pub use podium_core::RaceError;
    pub use podium_engine::ConfigError;

    // Engine
    pub use podium_engine::{
        Arrival, ChampionshipResult, FixedDelays, HeatControl, HeatReport, NoopObserver,
        RaceConfig, RaceCoordinator, RaceObserver, RandomDelays,
    };
}
