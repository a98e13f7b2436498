//! The contended critical section of a heat.
//!
//! A [`FinishLine`] borrows the championship's [`ScoreTable`] mutably for
//! the lifetime of one heat and hides it behind a heat-scoped lock.
//! [`cross`](FinishLine::cross) takes the next arrival position, converts
//! it to points, and awards them in one indivisible step, so positions
//! `1..=N` are handed out exactly once no matter how arrivals interleave.

use std::sync::Mutex;

use podium_core::{CompetitorId, HeatId, RaceError, ScoreTable, ScoringRule};

/// A competitor reaching the finish line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    /// Heat the arrival belongs to.
    pub heat: HeatId,
    /// Who arrived.
    pub competitor: CompetitorId,
    /// 1-based arrival position.
    pub position: u32,
    /// Points awarded for the position.
    pub points: u32,
    /// Cumulative score right after the award.
    pub total: u64,
}

struct LineState<'t> {
    table: &'t mut ScoreTable,
    arrived: u32,
    crossed: Vec<bool>,
    arrivals: Vec<Arrival>,
}

/// Heat-scoped arrival counter, scoring rule, and score table.
pub struct FinishLine<'t> {
    heat: HeatId,
    field_size: u32,
    rule: ScoringRule,
    state: Mutex<LineState<'t>>,
}

// Compile-time assertion: competitors share `&FinishLine` across threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<FinishLine<'static>>();
};

impl<'t> FinishLine<'t> {
    /// Open the finish line for `heat`, with one position per competitor
    /// in `table`.
    pub fn new(heat: HeatId, table: &'t mut ScoreTable, rule: ScoringRule) -> Self {
        let field_size = table.len() as u32;
        Self {
            heat,
            field_size,
            rule,
            state: Mutex::new(LineState {
                table,
                arrived: 0,
                crossed: vec![false; field_size as usize],
                arrivals: Vec::with_capacity(field_size as usize),
            }),
        }
    }

    /// The heat this line belongs to.
    pub fn heat(&self) -> HeatId {
        self.heat
    }

    /// Number of arrival positions (the field size).
    pub fn capacity(&self) -> u32 {
        self.field_size
    }

    /// Arrivals recorded so far.
    pub fn arrived(&self) -> Result<u32, RaceError> {
        Ok(self.lock()?.arrived)
    }

    /// Record `competitor` crossing the line.
    ///
    /// Fails without touching any score if the competitor is unknown,
    /// has already crossed this heat, or every position is taken.
    pub fn cross(&self, competitor: CompetitorId) -> Result<Arrival, RaceError> {
        let mut state = self.lock()?;
        if !state.table.contains(competitor) {
            return Err(RaceError::UnknownCompetitor { competitor });
        }
        if state.arrived >= self.field_size {
            return Err(RaceError::ArrivalOverflow {
                heat: self.heat,
                competitor,
                capacity: self.field_size as usize,
            });
        }
        if state.crossed[competitor.index()] {
            return Err(RaceError::DuplicateArrival {
                heat: self.heat,
                competitor,
            });
        }

        let position = state.arrived + 1;
        let points = self.rule.points(position, self.field_size);
        let total = state.table.award(competitor, points)?;
        state.arrived = position;
        state.crossed[competitor.index()] = true;

        let arrival = Arrival {
            heat: self.heat,
            competitor,
            position,
            points,
            total,
        };
        state.arrivals.push(arrival.clone());
        Ok(arrival)
    }

    /// Close the line, returning arrivals in position order and releasing
    /// the score table borrow.
    pub fn into_arrivals(self) -> Result<Vec<Arrival>, RaceError> {
        let heat = self.heat;
        self.state
            .into_inner()
            .map(|state| state.arrivals)
            .map_err(|_| RaceError::FinishLinePoisoned { heat })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LineState<'t>>, RaceError> {
        self.state
            .lock()
            .map_err(|_| RaceError::FinishLinePoisoned { heat: self.heat })
    }
}

impl std::fmt::Debug for FinishLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinishLine")
            .field("heat", &self.heat)
            .field("field_size", &self.field_size)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}
