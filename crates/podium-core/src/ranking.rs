//! Final ranking of a championship.
//!
//! Ranking is a pure function of the [`ScoreTable`]: competitors are
//! ordered by cumulative score, highest first, and equal scores are
//! broken by ascending competitor index. Arrival timing never takes part,
//! so ranking the same table twice always yields the same order.

use smallvec::SmallVec;

use crate::id::CompetitorId;
use crate::score::ScoreTable;

/// Number of places on the podium.
pub const PODIUM_SIZE: usize = 3;

/// One competitor's place in the final ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    /// 1-based place. Tied competitors still get distinct places.
    pub place: u32,
    /// The competitor.
    pub competitor: CompetitorId,
    /// Display name copied from the score table.
    pub name: String,
    /// Cumulative score.
    pub score: u64,
}

/// The top `min(3, N)` standings.
pub type Podium = SmallVec<[Standing; PODIUM_SIZE]>;

/// Every competitor ordered by score descending, then index ascending.
pub fn standings(table: &ScoreTable) -> Vec<Standing> {
    let mut order: Vec<_> = table.iter().collect();
    order.sort_by(|(a_id, a), (b_id, b)| b.score.cmp(&a.score).then(a_id.cmp(b_id)));
    order
        .into_iter()
        .enumerate()
        .map(|(i, (competitor, entry))| Standing {
            place: i as u32 + 1,
            competitor,
            name: entry.name.clone(),
            score: entry.score,
        })
        .collect()
}

/// The first [`PODIUM_SIZE`] entries of [`standings`].
pub fn podium(table: &ScoreTable) -> Podium {
    standings(table).into_iter().take(PODIUM_SIZE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(standings: &[Standing]) -> Vec<u32> {
        standings.iter().map(|s| s.competitor.0).collect()
    }

    #[test]
    fn orders_by_score_descending() {
        let table = ScoreTable::from_scores(&[1, 3, 2]);
        let podium = podium(&table);
        assert_eq!(ids(&podium), vec![1, 2, 0]);
        let scores: Vec<_> = podium.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![3, 2, 1]);
        let places: Vec<_> = podium.iter().map(|s| s.place).collect();
        assert_eq!(places, vec![1, 2, 3]);
    }

    #[test]
    fn ties_break_by_lower_index() {
        let table = ScoreTable::from_scores(&[5, 7, 7, 5, 7]);
        assert_eq!(ids(&standings(&table)), vec![1, 2, 4, 0, 3]);
    }

    #[test]
    fn podium_shrinks_for_small_fields() {
        assert_eq!(podium(&ScoreTable::from_scores(&[2, 9])).len(), 2);
        assert_eq!(podium(&ScoreTable::from_scores(&[4])).len(), 1);
        assert!(podium(&ScoreTable::default()).is_empty());
    }

    #[test]
    fn names_follow_competitors() {
        let mut table = ScoreTable::new(["Valentino", "Marc", "Jorge"]);
        table.award(CompetitorId(2), 10).unwrap();
        let top = podium(&table);
        assert_eq!(top[0].name, "Jorge");
        assert_eq!(top[1].name, "Valentino");
    }

    proptest! {
        #[test]
        fn ranking_is_deterministic_and_pure(scores in prop::collection::vec(0u64..20, 0..40)) {
            let table = ScoreTable::from_scores(&scores);
            let before = table.clone();
            let first = standings(&table);
            let second = standings(&table);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&table, &before);
            prop_assert_eq!(first.len(), scores.len());
        }

        #[test]
        fn standings_are_sorted(scores in prop::collection::vec(0u64..20, 1..40)) {
            let table = ScoreTable::from_scores(&scores);
            let ranked = standings(&table);
            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.score > b.score || (a.score == b.score && a.competitor < b.competitor));
            }
        }

        #[test]
        fn podium_is_prefix_of_standings(scores in prop::collection::vec(0u64..20, 0..40)) {
            let table = ScoreTable::from_scores(&scores);
            let top = podium(&table);
            let all = standings(&table);
            prop_assert_eq!(top.len(), scores.len().min(PODIUM_SIZE));
            prop_assert_eq!(&top[..], &all[..top.len()]);
        }
    }
}
