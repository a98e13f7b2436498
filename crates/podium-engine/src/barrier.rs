//! One-shot countdown barrier that ends a heat.
//!
//! [`HeatBarrier`] starts at the heat's competitor count. Competitors
//! never call [`arrive`](HeatBarrier::arrive) by hand; each one owns a
//! [`BarrierSignal`] that arrives when it drops. Normal return, an early
//! `?`, a panic unwinding the thread, or a thread that never got spawned
//! all drop the guard exactly once, so the coordinator's
//! [`wait`](HeatBarrier::wait) always returns.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Countdown latch for a single heat.
#[derive(Debug)]
pub struct HeatBarrier {
    parties: usize,
    remaining: Mutex<usize>,
    released: Condvar,
}

// Compile-time assertion: HeatBarrier must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<HeatBarrier>();
};

impl HeatBarrier {
    /// Create a barrier that releases after `parties` arrivals.
    ///
    /// A barrier with zero parties is released from the start.
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            remaining: Mutex::new(parties),
            released: Condvar::new(),
        }
    }

    /// Number of arrivals this barrier was created for.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Arrivals still outstanding.
    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    /// Whether every party has arrived.
    pub fn is_released(&self) -> bool {
        self.remaining() == 0
    }

    /// Take one "I owe an arrival" obligation.
    ///
    /// The returned guard calls [`arrive`](Self::arrive) when dropped.
    pub fn signal(&self) -> BarrierSignal<'_> {
        BarrierSignal { barrier: self }
    }

    /// Count one arrival, waking waiters when the count hits zero.
    ///
    /// Arriving at a released barrier leaves it released and is logged.
    pub fn arrive(&self) {
        let mut remaining = self.lock();
        match remaining.checked_sub(1) {
            Some(left) => {
                *remaining = left;
                if left == 0 {
                    self.released.notify_all();
                }
            }
            None => {
                tracing::error!(parties = self.parties, "arrival at an already released heat barrier");
            }
        }
    }

    /// Block until every party has arrived.
    pub fn wait(&self) {
        let remaining = self.lock();
        let _released = self
            .released
            .wait_while(remaining, |left| *left > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until every party has arrived or `timeout` elapses.
    ///
    /// Returns `true` if the barrier released.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let remaining = self.lock();
        let (left, _) = self
            .released
            .wait_timeout_while(remaining, timeout, |left| *left > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *left == 0
    }

    // The counter is only ever replaced whole, so a poisoned lock still
    // holds a consistent value.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped obligation to arrive at a [`HeatBarrier`].
///
/// Arrives exactly once, on drop.
#[must_use = "dropping a BarrierSignal arrives at the barrier immediately"]
#[derive(Debug)]
pub struct BarrierSignal<'b> {
    barrier: &'b HeatBarrier,
}

impl BarrierSignal<'_> {
    /// Arrive now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for BarrierSignal<'_> {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;

    #[test]
    fn counts_down_to_release() {
        let barrier = HeatBarrier::new(3);
        assert_eq!(barrier.remaining(), 3);
        barrier.arrive();
        barrier.arrive();
        assert!(!barrier.is_released());
        barrier.arrive();
        assert!(barrier.is_released());
        // Already released: wait returns immediately.
        barrier.wait();
    }

    #[test]
    fn zero_parties_starts_released() {
        let barrier = HeatBarrier::new(0);
        assert!(barrier.is_released());
        assert!(barrier.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn extra_arrival_is_ignored() {
        let barrier = HeatBarrier::new(1);
        barrier.arrive();
        barrier.arrive();
        assert_eq!(barrier.remaining(), 0);
    }

    #[test]
    fn signal_arrives_on_drop() {
        let barrier = HeatBarrier::new(2);
        {
            let _a = barrier.signal();
            let b = barrier.signal();
            b.release();
            assert_eq!(barrier.remaining(), 1);
        }
        assert!(barrier.is_released());
    }

    #[test]
    fn signal_arrives_when_thread_panics() {
        let barrier = HeatBarrier::new(2);
        thread::scope(|s| {
            let ok = barrier.signal();
            let doomed = barrier.signal();
            s.spawn(move || drop(ok));
            let handle = s.spawn(move || {
                let _owed = doomed;
                panic!("competitor crashed");
            });
            assert!(handle.join().is_err());
        });
        assert!(barrier.wait_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn wait_blocks_until_last_arrival() {
        let barrier = HeatBarrier::new(8);
        let done = AtomicUsize::new(0);
        thread::scope(|s| {
            for i in 0..8u64 {
                let signal = barrier.signal();
                let done = &done;
                s.spawn(move || {
                    thread::sleep(Duration::from_millis(2 * i));
                    done.fetch_add(1, Ordering::SeqCst);
                    drop(signal);
                });
            }
            barrier.wait();
            assert_eq!(done.load(Ordering::SeqCst), 8);
        });
    }

    #[test]
    fn wait_timeout_reports_stall() {
        let barrier = HeatBarrier::new(2);
        barrier.arrive();
        let start = Instant::now();
        assert!(!barrier.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(barrier.remaining(), 1);
    }
}
