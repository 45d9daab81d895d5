//! The cache client trait and its error type.

use std::time::Duration;

use serde_json::Value;

/// Errors a cache backend may report.
///
/// Callers treat every variant as "absent" on reads and as a silent
/// no-op on writes; none of them may reach an end user.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache operation timed out")]
    Timeout,

    #[error("Cache serialization failed: {0}")]
    Serialization(String),
}

/// Key-value cache with per-entry TTLs and pattern deletion.
///
/// Every write is a full-value overwrite; concurrent writers race with
/// last-write-wins semantics and no further coordination.
#[async_trait::async_trait]
pub trait ReportCache: Send + Sync {
    /// Look up a key. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Store a value under a key with the given time-to-live.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Remove every entry whose key matches the glob-style pattern
    /// (see [`crate::pattern::matches`]). Returns the removed count.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;
}
