//! The punch store accessor boundary.
//!
//! The report service is written against [`PunchStore`] rather than a
//! pool so tests can inject an in-memory accessor. Store errors are the
//! one failure the engine propagates unchanged: a failed read has no
//! safe default.

use punchcard_core::punch::{DateRange, OrgFilter, Punch};
use sqlx::PgPool;

use crate::models::punch::PunchRow;
use crate::repositories::PunchRepo;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Punch store query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Queryable source of raw punch rows. No ordering guarantee.
#[async_trait::async_trait]
pub trait PunchStore: Send + Sync {
    async fn query_punches(
        &self,
        range: &DateRange,
        filter: &OrgFilter,
        employee_id: Option<&str>,
    ) -> Result<Vec<Punch>, StoreError>;
}

/// Postgres-backed accessor used in production.
pub struct PgPunchStore {
    pool: PgPool,
}

impl PgPunchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PunchStore for PgPunchStore {
    async fn query_punches(
        &self,
        range: &DateRange,
        filter: &OrgFilter,
        employee_id: Option<&str>,
    ) -> Result<Vec<Punch>, StoreError> {
        let rows = PunchRepo::query_range(&self.pool, range, filter, employee_id).await?;
        tracing::debug!(
            rows = rows.len(),
            start = %range.start,
            end = %range.end,
            "Fetched punch rows"
        );
        Ok(rows.into_iter().map(PunchRow::into_punch).collect())
    }
}
