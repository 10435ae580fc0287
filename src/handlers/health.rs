//! Health and readiness endpoints.
//!
//! - `GET /health` - Liveness with version and uptime, always 200
//! - `GET /ready` - Readiness probe, 200 once the router is serving
//!
//! Neither endpoint calls the upstream services.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::instrument;

use crate::models::HealthResponse;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

/// Health check endpoint.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "uptime_seconds": 42,
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
#[instrument(skip(state))]
pub async fn health_check<C: UpstreamClient>(
    State(state): State<AppState<C>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        timestamp: Utc::now(),
    })
}

/// Readiness check endpoint for Kubernetes probes.
#[instrument]
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
