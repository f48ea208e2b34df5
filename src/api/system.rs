use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthResponse};

/// `GET /api/health`
///
/// Reports process liveness and database connectivity.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = state.store().ping().await.is_ok();
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::success(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            database,
            uptime_seconds: state.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
        })),
    )
}
