//! `user_id` header authorization gate.
//!
//! A fixed single-user check placed in front of the relay: the request is
//! passed on only when the `user_id` header is exactly `1`. Anything else,
//! including a missing header, ends the request with `403 Forbidden` and an
//! empty body before any handler or upstream call runs.
//!
//! ```bash
//! curl -X POST -H "user_id: 1" -H "Content-Type: application/json" \
//!      -d '{"userId":1,"title":"t","body":"b"}' http://localhost:3000/
//! ```
//!
//! # Bypassed Endpoints
//!
//! Paths in `AUTH_BYPASS_PATHS` (default `/health`, `/ready`) skip the gate.
//! Matching is exact and case-sensitive against `request.uri().path()`.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::response::IntoResponse;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::metrics;

/// Header inspected by the gate.
pub const USER_ID_HEADER: &str = "user_id";

/// The only header value the gate lets through.
pub const AUTHORIZED_USER_ID: &str = "1";

/// Outcome of inspecting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    Deny,
}

impl AuthorizationDecision {
    /// Decide from the raw header bytes, if any.
    pub fn from_header(value: Option<&[u8]>) -> Self {
        match value {
            Some(v) if bool::from(v.ct_eq(AUTHORIZED_USER_ID.as_bytes())) => Self::Allow,
            _ => Self::Deny,
        }
    }
}

/// Tower layer installing the gate.
#[derive(Clone)]
pub struct UserIdGate {
    bypass_paths: Arc<Vec<String>>,
}

impl UserIdGate {
    /// Create a gate that skips the given paths.
    pub fn new(bypass_paths: Vec<String>) -> Self {
        Self {
            bypass_paths: Arc::new(bypass_paths),
        }
    }
}

impl<S> Layer<S> for UserIdGate {
    type Service = UserIdGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserIdGateService {
            inner,
            bypass_paths: self.bypass_paths.clone(),
        }
    }
}

/// Service wrapper produced by [`UserIdGate`].
#[derive(Clone)]
pub struct UserIdGateService<S> {
    inner: S,
    bypass_paths: Arc<Vec<String>>,
}

impl<S> Service<Request<Body>> for UserIdGateService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Take the readied service, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let path = req.uri().path();
        if self.bypass_paths.iter().any(|p| p == path) {
            debug!(path, "Bypassing user_id gate");
            return Box::pin(inner.call(req));
        }

        let header = req.headers().get(USER_ID_HEADER).map(|v| v.as_bytes());
        let decision = AuthorizationDecision::from_header(header);
        metrics::record_gate_decision(decision == AuthorizationDecision::Allow);

        match decision {
            AuthorizationDecision::Allow => {
                debug!(path, "user_id gate passed");
                Box::pin(inner.call(req))
            }
            AuthorizationDecision::Deny => {
                warn!(
                    path,
                    header_present = header.is_some(),
                    "Rejected request with unauthorized user_id"
                );
                Box::pin(async { Ok(StatusCode::FORBIDDEN.into_response()) })
            }
        }
    }
}
