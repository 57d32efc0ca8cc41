//! Per-endpoint "latest dispatch wins" guard.
//!
//! Network completions can arrive out of order relative to when they were
//! issued. Each endpoint keeps a watermark: the highest dispatch timestamp
//! whose completion has been accepted. A completion is accepted only if its
//! dispatch timestamp is strictly greater than the watermark, so of two calls
//! stamped with the same millisecond the first one evaluated wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::endpoint::Endpoint;

/// Milliseconds since the Unix epoch, taken when a call is issued.
pub type DispatchTimestamp = i64;

/// Source of dispatch timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> DispatchTimestamp;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> DispatchTimestamp {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DispatchTimestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set(&self, now: DispatchTimestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> DispatchTimestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Watermark table plus the clock used to stamp dispatches.
pub struct StalenessGuard {
    clock: Arc<dyn Clock>,
    watermarks: Mutex<HashMap<Endpoint, DispatchTimestamp>>,
}

impl StalenessGuard {
    /// Create a guard with every endpoint's watermark at the epoch.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let watermarks = Endpoint::ALL.iter().map(|&e| (e, 0)).collect();
        Self {
            clock,
            watermarks: Mutex::new(watermarks),
        }
    }

    /// Stamp a call at the moment it is issued.
    pub fn record(&self, endpoint: Endpoint) -> DispatchTimestamp {
        let dispatched_at = self.clock.now_millis();
        debug!(endpoint = %endpoint, dispatched_at, "Dispatching request");
        dispatched_at
    }

    /// Advance the watermark to `dispatched_at` if it is strictly newer.
    ///
    /// Returns false and leaves the watermark untouched otherwise.
    pub fn accept(&self, endpoint: Endpoint, dispatched_at: DispatchTimestamp) -> bool {
        self.settle(endpoint, dispatched_at, || ()).is_some()
    }

    /// Run `on_accept` if the completion is accepted, holding the table lock so
    /// no other completion can interleave between the check and its effects.
    pub fn settle<R>(
        &self,
        endpoint: Endpoint,
        dispatched_at: DispatchTimestamp,
        on_accept: impl FnOnce() -> R,
    ) -> Option<R> {
        let mut watermarks = self
            .watermarks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let watermark = watermarks.entry(endpoint).or_insert(0);

        if dispatched_at > *watermark {
            *watermark = dispatched_at;
            debug!(endpoint = %endpoint, dispatched_at, "Accepted completion");
            Some(on_accept())
        } else {
            debug!(
                endpoint = %endpoint,
                dispatched_at,
                watermark = *watermark,
                "Discarding superseded completion"
            );
            None
        }
    }

    /// Current watermark for an endpoint.
    pub fn watermark(&self, endpoint: Endpoint) -> DispatchTimestamp {
        self.watermarks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for StalenessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StalenessGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard_at(start: DispatchTimestamp) -> (Arc<ManualClock>, StalenessGuard) {
        let clock = Arc::new(ManualClock::new(start));
        let guard = StalenessGuard::new(clock.clone());
        (clock, guard)
    }

    #[test]
    fn watermarks_start_at_epoch() {
        let (_, guard) = guard_at(100);
        for endpoint in Endpoint::ALL {
            assert_eq!(guard.watermark(endpoint), 0);
        }
    }

    #[test]
    fn record_reads_clock_at_dispatch() {
        let (clock, guard) = guard_at(100);
        assert_eq!(guard.record(Endpoint::GetUser), 100);
        clock.advance(50);
        assert_eq!(guard.record(Endpoint::GetUser), 150);
        // Recording alone never moves the watermark.
        assert_eq!(guard.watermark(Endpoint::GetUser), 0);
    }

    #[test]
    fn newer_completion_advances_watermark() {
        let (_, guard) = guard_at(0);
        assert!(guard.accept(Endpoint::GetUser, 100));
        assert_eq!(guard.watermark(Endpoint::GetUser), 100);
    }

    #[test]
    fn older_completion_after_newer_is_rejected() {
        let (_, guard) = guard_at(0);
        assert!(guard.accept(Endpoint::GetUser, 200));
        assert!(!guard.accept(Endpoint::GetUser, 100));
        assert_eq!(guard.watermark(Endpoint::GetUser), 200);
    }

    #[test]
    fn identical_timestamps_accept_only_first() {
        let (clock, guard) = guard_at(100);
        let first = guard.record(Endpoint::CreateSession);
        let second = guard.record(Endpoint::CreateSession);
        assert_eq!(first, second);
        assert_eq!(clock.now_millis(), 100);

        assert!(guard.accept(Endpoint::CreateSession, first));
        assert!(!guard.accept(Endpoint::CreateSession, second));
    }

    #[test]
    fn endpoints_are_tracked_independently() {
        let (_, guard) = guard_at(0);
        assert!(guard.accept(Endpoint::GetUser, 300));
        assert!(guard.accept(Endpoint::GetStatistics, 100));
        assert_eq!(guard.watermark(Endpoint::GetUser), 300);
        assert_eq!(guard.watermark(Endpoint::GetStatistics), 100);
    }

    #[test]
    fn settle_skips_effects_when_superseded() {
        let (_, guard) = guard_at(0);
        assert_eq!(guard.settle(Endpoint::GetTag, 10, || "fresh"), Some("fresh"));
        let mut ran = false;
        let outcome = guard.settle(Endpoint::GetTag, 5, || ran = true);
        assert!(outcome.is_none());
        assert!(!ran);
    }

    #[test]
    fn watermark_never_decreases() {
        let (_, guard) = guard_at(0);
        let mut highest = 0;
        for ts in [5, 3, 9, 9, 1, 12, 11, 40, 2] {
            guard.accept(Endpoint::ListQuestions, ts);
            let current = guard.watermark(Endpoint::ListQuestions);
            assert!(current >= highest);
            highest = current;
        }
        assert_eq!(highest, 40);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_millis() > 0);
    }
}
