//! Core types and traits for the Podium race engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Podium workspace:
//! competitor and heat IDs, the score table, scoring rules, error
//! types, the delay-source trait, and the pure ranking functions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod ranking;
pub mod score;
pub mod scoring;
pub mod traits;

pub use error::RaceError;
pub use id::{CompetitorId, HeatId};
pub use ranking::{podium, standings, Podium, Standing, PODIUM_SIZE};
pub use score::{default_name, ScoreEntry, ScoreTable};
pub use scoring::ScoringRule;
pub use traits::DelaySource;
