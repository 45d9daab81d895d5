//! Process-local cache statistics.
//!
//! Counters are plain atomics updated with relaxed ordering: they are
//! observability data, not synchronization, and lost-update-free
//! increments are all that is required under concurrent requests. They
//! reset only on explicit request or process restart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Running counters for cache operations.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    set_failures: AtomicU64,
    deleted_entries: AtomicU64,
    get_latency_micros: AtomicU64,
    set_latency_micros: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self, elapsed: Duration) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.get_latency_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_miss(&self, elapsed: Duration) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.get_latency_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_set(&self, elapsed: Duration) {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.set_latency_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_set_failure(&self) {
        self.set_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self, count: u64) {
        self.deleted_entries.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStatsSnapshot {
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            set_failures: self.set_failures.load(Ordering::Relaxed),
            deleted_entries: self.deleted_entries.load(Ordering::Relaxed),
            get_latency_micros: self.get_latency_micros.load(Ordering::Relaxed),
            set_latency_micros: self.set_latency_micros.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.sets.store(0, Ordering::Relaxed);
        self.set_failures.store(0, Ordering::Relaxed);
        self.deleted_entries.store(0, Ordering::Relaxed);
        self.get_latency_micros.store(0, Ordering::Relaxed);
        self.set_latency_micros.store(0, Ordering::Relaxed);
    }
}

/// Serializable view of [`CacheStats`].
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub set_failures: u64,
    pub deleted_entries: u64,
    pub get_latency_micros: u64,
    pub set_latency_micros: u64,
    pub hit_rate: f64,
}
