//! Route definitions for the attendance report engine.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{cache_admin, reports};
use crate::state::AppState;

/// Report routes mounted at `/reports`.
///
/// ```text
/// GET  /attendance          -> generate_report
/// GET  /filters             -> report_filters
/// GET  /cache/stats         -> cache_stats
/// POST /cache/stats/reset   -> reset_cache_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(reports::generate_report))
        .route("/filters", get(reports::report_filters))
        .route("/cache/stats", get(cache_admin::cache_stats))
        .route("/cache/stats/reset", post(cache_admin::reset_cache_stats))
}
