//! In-memory cache store backed by moka.
//!
//! Entries carry their own TTL (the policy assigns different tiers per
//! key), so expiry is enforced on read against the stored deadline and
//! moka's capacity-based eviction handles memory pressure. Pattern
//! deletion walks the live entries eagerly and removes matches.

use std::time::{Duration, Instant};

use moka::sync::Cache;
use serde_json::Value;

use crate::client::{CacheError, ReportCache};
use crate::pattern;

/// Default maximum number of cached report payloads.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Tuning for the in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

#[derive(Clone)]
struct CacheEntry {
    payload: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

/// In-memory [`ReportCache`] implementation.
pub struct MemoryCache {
    entries: Cache<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new(config: MemoryCacheConfig) -> Self {
        Self {
            entries: Cache::builder().max_capacity(config.max_capacity).build(),
        }
    }

    /// Number of live entries (expired-but-unevicted entries included).
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

#[async_trait::async_trait]
impl ReportCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.invalidate(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.payload)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload: value,
                stored_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| pattern::matches(pattern, key.as_str()))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let removed = matching.len() as u64;
        for key in matching {
            self.entries.invalidate(&key);
        }

        if removed > 0 {
            tracing::debug!(pattern = %pattern, removed, "Cache entries invalidated");
        }

        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
