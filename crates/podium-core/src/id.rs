//! Strongly-typed identifiers for competitors and heats.

use std::fmt;

/// Identifies a competitor within a championship.
///
/// Competitors are registered when the score table is built and assigned
/// sequential IDs. `CompetitorId(n)` is the n-th entry of the table and
/// stays stable for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompetitorId(pub u32);

impl CompetitorId {
    /// Zero-based position of this competitor in the score table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CompetitorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// One-based heat number.
///
/// Heats run strictly in sequence: heat `h + 1` never starts before
/// heat `h` has fully drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeatId(pub u32);

impl HeatId {
    /// The heat that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for HeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for HeatId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competitor_index_matches_raw_value() {
        assert_eq!(CompetitorId(0).index(), 0);
        assert_eq!(CompetitorId(41).index(), 41);
        assert_eq!(CompetitorId::from(7), CompetitorId(7));
    }

    #[test]
    fn heat_next_is_sequential() {
        let h = HeatId(1);
        assert_eq!(h.next(), HeatId(2));
        assert_eq!(h.next().next().to_string(), "3");
    }

    #[test]
    fn ids_order_by_raw_value() {
        assert!(CompetitorId(1) < CompetitorId(2));
        assert!(HeatId(9) < HeatId(10));
    }
}
