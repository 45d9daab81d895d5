//! Liveness/readiness handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
///
/// Reports process liveness and database reachability. Returns 503 when
/// the database ping fails so load balancers can rotate the instance.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match punchcard_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok",
                database: "up",
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "degraded",
                    database: "down",
                }),
            )
        }
    }
}
