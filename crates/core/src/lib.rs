//! Pure domain logic for the punchcard attendance engine.
//!
//! This crate contains no I/O and no database dependencies: scan-type
//! normalization, employee-day session classification, the report
//! aggregation strategies, the cache key grammar and the TTL policy all
//! operate over pre-loaded data passed in by the caller.

pub mod cache_key;
pub mod error;
pub mod punch;
pub mod report;
pub mod scan;
pub mod session;
pub mod ttl;
pub mod types;
