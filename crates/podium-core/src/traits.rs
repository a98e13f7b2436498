//! Core abstraction traits.

use std::sync::Arc;
use std::time::Duration;

use crate::id::{CompetitorId, HeatId};

/// Supplies how long a competitor takes to reach the finish line.
///
/// Called once per competitor per heat, from that competitor's own
/// thread, so implementations must be `Send + Sync`. The returned
/// duration is the only thing that orders arrivals; production sources
/// are randomized, test sources return fixed values.
pub trait DelaySource: Send + Sync {
    /// Wait duration for `competitor` in `heat`.
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration;
}

impl<T: DelaySource + ?Sized> DelaySource for &T {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        (**self).delay(heat, competitor)
    }
}

impl<T: DelaySource + ?Sized> DelaySource for Box<T> {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        (**self).delay(heat, competitor)
    }
}

impl<T: DelaySource + ?Sized> DelaySource for Arc<T> {
    fn delay(&self, heat: HeatId, competitor: CompetitorId) -> Duration {
        (**self).delay(heat, competitor)
    }
}
