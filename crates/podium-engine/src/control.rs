//! Per-heat cancellation of competitor waits.
//!
//! Each competitor waits on its own bounded(1) crossbeam channel with
//! `recv_timeout(delay)`. [`HeatControl`] holds the sending halves: a
//! message cuts that competitor's wait short. Cancelling never stops a
//! competitor from crossing; it only makes it cross sooner.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use podium_core::{CompetitorId, HeatId};

/// Handle for cutting competitor waits short during one heat.
///
/// Cheap to clone; clones may be moved to other threads. Cancelling after
/// a competitor has finished its wait has no effect.
#[derive(Clone, Debug)]
pub struct HeatControl {
    heat: HeatId,
    flags: Arc<[Sender<()>]>,
}

impl HeatControl {
    /// Create a control for `competitors` waits, returning the receivers
    /// in competitor-index order.
    pub(crate) fn new(heat: HeatId, competitors: usize) -> (Self, Vec<Receiver<()>>) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..competitors)
            .map(|_| crossbeam_channel::bounded(1))
            .unzip();
        let control = Self {
            heat,
            flags: senders.into(),
        };
        (control, receivers)
    }

    /// The heat this control belongs to.
    pub fn heat(&self) -> HeatId {
        self.heat
    }

    /// Number of competitors in the heat.
    pub fn competitors(&self) -> usize {
        self.flags.len()
    }

    /// Cut `competitor`'s wait short.
    ///
    /// Returns `false` if the competitor is not part of this heat.
    pub fn cancel(&self, competitor: CompetitorId) -> bool {
        let Some(flag) = self.flags.get(competitor.index()) else {
            return false;
        };
        match flag.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::trace!(heat = self.heat.0, competitor = competitor.0, "already cancelled");
            }
            Err(TrySendError::Disconnected(())) => {
                tracing::trace!(heat = self.heat.0, competitor = competitor.0, "already finished");
            }
        }
        true
    }

    /// Cut every wait in the heat short (red flag).
    pub fn cancel_all(&self) {
        for flag in self.flags.iter() {
            let _ = flag.try_send(());
        }
    }
}
