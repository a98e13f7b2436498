//! Conversion of arrival positions into points.
//!
//! The default [`ScoringRule::Linear`] rule awards `N + 1 - p` points to
//! the competitor arriving at 1-based position `p` in a field of `N`, so
//! every heat distributes exactly the points `1..=N`. A fixed
//! [`ScoringRule::Table`] is available for championships with a
//! published points scale.

use std::sync::Arc;

/// Rule that maps an arrival position to the points it earns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ScoringRule {
    /// First place earns `N` points, last place earns 1.
    #[default]
    Linear,
    /// `table[p - 1]` points for position `p`; positions past the end of
    /// the table earn nothing.
    Table(Arc<[u32]>),
}

impl ScoringRule {
    /// The MotoGP points scale: 25, 20, 16, 13, 11, 10 … 1 for the top 15.
    pub fn motogp() -> Self {
        Self::Table(Arc::from(
            &[25, 20, 16, 13, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1][..],
        ))
    }

    /// Points for arriving at 1-based `position` in a field of
    /// `field_size` competitors.
    ///
    /// Position 0 and positions past the field earn nothing.
    pub fn points(&self, position: u32, field_size: u32) -> u32 {
        if position == 0 || position > field_size {
            return 0;
        }
        match self {
            Self::Linear => field_size + 1 - position,
            Self::Table(table) => table
                .get(position as usize - 1)
                .copied()
                .unwrap_or(0),
        }
    }

    /// Points distributed by one complete heat of `field_size` competitors.
    pub fn heat_total(&self, field_size: u32) -> u64 {
        match self {
            Self::Linear => {
                let n = u64::from(field_size);
                n * (n + 1) / 2
            }
            Self::Table(_) => (1..=field_size)
                .map(|p| u64::from(self.points(p, field_size)))
                .sum(),
        }
    }
}
