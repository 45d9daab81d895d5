//! Handlers for cache invalidation and statistics.
//!
//! The invalidation endpoints are the boundary the employee-mutation and
//! org-mutation workflows call into whenever underlying punch or
//! hierarchy data changes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::reports::service::InvalidationScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result envelope for invalidation endpoints.
#[derive(Debug, Serialize)]
pub struct InvalidationResult {
    pub removed: u64,
}

/// Body for organization-scoped invalidation.
#[derive(Debug, Deserialize)]
pub struct InvalidateOrganizationBody {
    pub division_id: String,
    pub section_id: Option<String>,
    pub sub_section_id: Option<String>,
}

/// Body for namespace-wide invalidation.
#[derive(Debug, Deserialize)]
pub struct InvalidateScopeBody {
    pub scope: InvalidationScope,
}

/// POST /cache/invalidate/employee/{employee_id}
///
/// Called after an employee-level mutation (transfer, correction).
/// Clears the employee's individual reports plus every group report.
pub async fn invalidate_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let removed = state.reports.invalidate_employee(&employee_id).await;
    Ok(Json(DataResponse {
        data: InvalidationResult { removed },
    }))
}

/// POST /cache/invalidate/organization
///
/// Called after a division/section/sub-section mutation. Clears exactly
/// the group reports scoped to that slice.
pub async fn invalidate_organization(
    State(state): State<AppState>,
    Json(body): Json<InvalidateOrganizationBody>,
) -> AppResult<impl IntoResponse> {
    let removed = state
        .reports
        .invalidate_organization(
            Some(body.division_id.as_str()),
            body.section_id.as_deref(),
            body.sub_section_id.as_deref(),
        )
        .await;
    Ok(Json(DataResponse {
        data: InvalidationResult { removed },
    }))
}

/// POST /cache/invalidate
///
/// Namespace-wide invalidation, e.g. after a sync rebuild or a settings
/// change that affects every report.
pub async fn invalidate_scope(
    State(state): State<AppState>,
    Json(body): Json<InvalidateScopeBody>,
) -> AppResult<impl IntoResponse> {
    let removed = state.reports.invalidate_all(body.scope).await;
    Ok(Json(DataResponse {
        data: InvalidationResult { removed },
    }))
}

/// GET /reports/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.reports.stats(),
    }))
}

/// POST /reports/cache/stats/reset
pub async fn reset_cache_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.reports.reset_stats();
    tracing::info!("Cache statistics reset");
    Ok(Json(DataResponse {
        data: state.reports.stats(),
    }))
}
