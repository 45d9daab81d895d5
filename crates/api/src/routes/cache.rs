//! Route definitions for cache invalidation.
//!
//! Called by the employee- and org-mutation workflows, which live
//! outside this service.

use axum::routing::post;
use axum::Router;

use crate::handlers::cache_admin;
use crate::state::AppState;

/// Invalidation routes mounted at `/cache`.
///
/// ```text
/// POST /invalidate                             -> invalidate_scope
/// POST /invalidate/employee/{employee_id}      -> invalidate_employee
/// POST /invalidate/organization                -> invalidate_organization
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invalidate", post(cache_admin::invalidate_scope))
        .route(
            "/invalidate/employee/{employee_id}",
            post(cache_admin::invalidate_employee),
        )
        .route(
            "/invalidate/organization",
            post(cache_admin::invalidate_organization),
        )
}
