//! Route tree assembly.

pub mod cache;
pub mod health;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /reports/attendance            report generation
/// /reports/filters               cached org hierarchy
/// /reports/cache/stats           cache statistics (+ reset)
/// /cache/invalidate/...          invalidation boundary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router())
        .nest("/cache", cache::router())
}
