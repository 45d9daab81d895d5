use std::sync::Arc;

use punchcard_cache::MemoryCache;
use punchcard_db::store::PgPunchStore;

use crate::config::ServerConfig;
use crate::reports::service::ReportService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: punchcard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cache-aside report engine.
    pub reports: Arc<ReportService<PgPunchStore, MemoryCache>>,
}
