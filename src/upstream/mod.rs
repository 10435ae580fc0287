//! Outbound HTTP capability used by the relay.
//!
//! The relay never talks to `reqwest` directly. It is generic over
//! [`UpstreamClient`], which exposes the two calls it needs:
//!
//! - `get_json` - GET a URL and decode the JSON body
//! - `post_json` - POST a JSON payload and return the response body byte for byte
//!
//! [`HttpClient`] is the production implementation. Tests inject their own.
//!
//! # Failure Mapping
//!
//! | Condition                         | Error                        |
//! |-----------------------------------|------------------------------|
//! | Connection or transport failure   | `AppError::Upstream`         |
//! | Non-2xx status                    | `AppError::Upstream`         |
//! | GET body is not the expected JSON | `AppError::Upstream`         |
//! | Client timeout elapsed            | `AppError::UpstreamTimeout`  |

mod http;

use std::future::Future;

use axum::body::Bytes;
use axum::http::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppResult;

pub use http::HttpClient;

/// Undecoded response body from the posts service.
///
/// Relayed to the caller as-is: never parsed, so key order, number precision
/// and non-JSON or empty bodies survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBody {
    pub bytes: Bytes,
    /// The upstream `Content-Type`, if it sent one.
    pub content_type: Option<HeaderValue>,
}

/// HTTP client capability injected into the relay.
pub trait UpstreamClient: Clone + Send + Sync + 'static {
    /// Issue a GET to `url` and decode the response body as `T`.
    fn get_json<T>(&self, url: &str) -> impl Future<Output = AppResult<T>> + Send
    where
        T: DeserializeOwned + Send;

    /// Issue a POST to `url` with `payload` as JSON and return the response
    /// body unmodified.
    fn post_json<B>(
        &self,
        url: &str,
        payload: &B,
    ) -> impl Future<Output = AppResult<UpstreamBody>> + Send
    where
        B: Serialize + Sync;
}
