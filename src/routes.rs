//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (outermost first)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Sets/propagates X-Request-Id
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  user_id Gate    │ ← 403 unless user_id == "1" (bypassed for /health, /ready)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  CORS, Body Limit│
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::UserIdGate;
use crate::state::AppState;
use crate::upstream::UpstreamClient;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the application router with all routes and middleware configured.
///
/// - **Gate**: installed when `auth_gate_enabled` is set
/// - **CORS**: configured from `cors_allowed_origins`
/// - **Body limit**: `max_request_body_size`
pub fn build_router<C: UpstreamClient>(state: AppState<C>) -> Router {
    let config = &state.config;

    let mut router = Router::new()
        .route("/", post(handlers::create_post::<C>))
        .route("/health", get(handlers::health_check::<C>))
        .route("/ready", get(handlers::readiness_check));

    // Applied bottom to top: each layer wraps everything added before it
    router = router
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(build_cors_layer(&config.cors_allowed_origins));

    if config.auth_gate_enabled {
        info!(
            bypass_paths = ?config.auth_bypass_paths,
            "user_id authorization gate enabled"
        );
        router = router.layer(UserIdGate::new(config.auth_bypass_paths.clone()));
    } else {
        info!("user_id authorization gate disabled (AUTH_GATE_ENABLED=false)");
    }

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    router.with_state(state)
}

/// Build CORS layer from configuration; `*` allows any origin.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
