//! Cache Statistics Module
//!
//! Tracks per-store hits, misses and upstream failures.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Lock-free counters shared by every reader of a store.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Reads answered from the store
    hits: AtomicU64,
    /// Reads that went upstream
    misses: AtomicU64,
    /// Upstream fetches that ended in a sentinel value
    upstream_failures: AtomicU64,
}

/// Point-in-time copy of a store's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StoreStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub upstream_failures: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Failure ==
    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters, pairing them with the store's current size.
    pub fn snapshot(&self, total_entries: usize) -> StoreStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        StoreStatsSnapshot {
            hits,
            misses,
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            total_entries,
            hit_rate,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let snapshot = CacheStats::new().snapshot(0);
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.upstream_failures, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.snapshot(1).hit_rate, 0.75);
    }

    #[test]
    fn test_record_upstream_failure() {
        let stats = CacheStats::new();
        stats.record_miss();
        stats.record_upstream_failure();
        let snapshot = stats.snapshot(1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.upstream_failures, 1);
        assert_eq!(snapshot.total_entries, 1);
    }
}
