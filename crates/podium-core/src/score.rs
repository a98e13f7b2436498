//! The persistent score table shared by every heat of a championship.
//!
//! [`ScoreTable`] keeps one [`ScoreEntry`] per competitor in an
//! [`IndexMap`], so iteration order is always competitor-index order.
//! The table has no interior mutability: the coordinator owns it and
//! lends `&mut` access to exactly one finish line at a time, which is
//! what keeps score updates single-writer.

use indexmap::IndexMap;

use crate::error::RaceError;
use crate::id::CompetitorId;

/// Display name used when the caller does not supply one.
///
/// Competitor `0` is "Competitor #1".
pub fn default_name(id: CompetitorId) -> String {
    format!("Competitor #{}", id.0 + 1)
}

/// A competitor's row in the score table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Display name.
    pub name: String,
    /// Cumulative points across all heats run so far.
    pub score: u64,
}

/// Cumulative scores keyed by competitor, in competitor-index order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreTable {
    entries: IndexMap<CompetitorId, ScoreEntry>,
}

impl ScoreTable {
    /// Build a zeroed table, assigning IDs `0..n` in iteration order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    CompetitorId(i as u32),
                    ScoreEntry {
                        name: name.into(),
                        score: 0,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Build a zeroed table of `count` competitors with default names.
    pub fn with_default_names(count: u32) -> Self {
        Self::new((0..count).map(|i| default_name(CompetitorId(i))))
    }

    /// Build a table with preset scores and default names.
    ///
    /// Mostly useful for ranking a known score distribution.
    pub fn from_scores(scores: &[u64]) -> Self {
        let mut table = Self::with_default_names(scores.len() as u32);
        for (entry, &score) in table.entries.values_mut().zip(scores) {
            entry.score = score;
        }
        table
    }

    /// Number of registered competitors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no competitors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: CompetitorId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Cumulative score of `id`, or `None` if unregistered.
    pub fn score(&self, id: CompetitorId) -> Option<u64> {
        self.entries.get(&id).map(|e| e.score)
    }

    /// Display name of `id`, or `None` if unregistered.
    pub fn name(&self, id: CompetitorId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.name.as_str())
    }

    /// Add `points` to `id` and return the new cumulative score.
    pub fn award(&mut self, id: CompetitorId, points: u32) -> Result<u64, RaceError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(RaceError::UnknownCompetitor { competitor: id })?;
        entry.score += u64::from(points);
        Ok(entry.score)
    }

    /// Sum of every competitor's cumulative score.
    pub fn total(&self) -> u64 {
        self.entries.values().map(|e| e.score).sum()
    }

    /// Iterate entries in competitor-index order.
    pub fn iter(&self) -> impl Iterator<Item = (CompetitorId, &ScoreEntry)> + '_ {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    /// Registered IDs in competitor-index order.
    pub fn ids(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        self.entries.keys().copied()
    }

    /// Cumulative scores in competitor-index order.
    pub fn scores(&self) -> Vec<u64> {
        self.entries.values().map(|e| e.score).collect()
    }
}
