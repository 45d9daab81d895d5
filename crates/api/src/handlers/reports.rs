//! Handlers for the attendance reconciliation reports.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use punchcard_core::cache_key::hierarchy_key;
use punchcard_core::ttl::TtlTier;
use punchcard_db::models::org::{Division, Section, SubSection};
use punchcard_db::repositories::OrgRepo;

use crate::error::{AppError, AppResult};
use crate::reports::params::ReportQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /reports/attendance
///
/// Generate a punch reconciliation report for a date range, optionally
/// scoped to an organizational slice or a single employee. Served from
/// cache when a fresh entry exists.
pub async fn generate_report(
    State(state): State<AppState>,
    Query(params): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let request = params.into_request()?;
    let report = state.reports.generate_report(&request).await?;
    Ok(Json(DataResponse { data: report }))
}

/// Options for the report filter dropdowns: the full org hierarchy.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterOptions {
    pub divisions: Vec<Division>,
    pub sections: Vec<Section>,
    pub sub_sections: Vec<SubSection>,
}

/// GET /reports/filters
///
/// The organizational hierarchy used to populate report filters.
/// Low-cardinality and rarely changing, so cached under the flat
/// hierarchy TTL tier.
pub async fn report_filters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = state.pool.clone();

    let options: FilterOptions = state
        .reports
        .cached_lookup(
            &hierarchy_key("filters"),
            TtlTier::Hierarchy.duration(),
            || async move {
                Ok::<_, AppError>(FilterOptions {
                    divisions: OrgRepo::list_divisions(&pool).await?,
                    sections: OrgRepo::list_sections(&pool).await?,
                    sub_sections: OrgRepo::list_sub_sections(&pool).await?,
                })
            },
        )
        .await?;

    Ok(Json(DataResponse { data: options }))
}
