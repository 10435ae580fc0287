//! Post creation relay endpoint.
//!
//! # Endpoints
//!
//! - `POST /` - Validate the author against the directory and forward the post
//!
//! # Responses
//!
//! | Status | Body                          | When                               |
//! |--------|-------------------------------|------------------------------------|
//! | 201    | posts service response, as-is | `userId` found in the directory    |
//! | 404    | empty                         | `userId` not in the directory      |
//! | 400    | JSON error                    | body is not a valid post           |
//! | 502    | JSON error                    | directory or posts service failed  |
//! | 504    | JSON error                    | upstream timed out                 |

use axum::Json;
use axum::body::Body;
use axum::extract::{Form, FromRequest, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::models::Post;
use crate::services::RelayOutcome;
use crate::state::AppState;
use crate::upstream::{UpstreamBody, UpstreamClient};

/// Post extracted from a JSON or URL-encoded form body.
///
/// Rejections become `AppError::BadRequest` so they share the API error format.
#[derive(Debug)]
pub struct PostBody(pub Post);

impl<S> FromRequest<S> for PostBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(post) = Form::<Post>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(Self(post));
        }

        let Json(post) = Json::<Post>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(post))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Relay a post creation request.
///
/// # Request Body
///
/// ```json
/// {
///   "userId": 1,
///   "title": "Título",
///   "body": "Cuerpo del post"
/// }
/// ```
#[instrument(skip_all)]
pub async fn create_post<C: UpstreamClient>(
    State(state): State<AppState<C>>,
    PostBody(post): PostBody,
) -> AppResult<Response> {
    let response = match state.relay.relay(&post).await? {
        RelayOutcome::Forwarded(created) => created_response(created),
        RelayOutcome::UnknownUser => StatusCode::NOT_FOUND.into_response(),
    };

    Ok(response)
}

/// 201 carrying the posts service body and `Content-Type` untouched.
fn created_response(created: UpstreamBody) -> Response {
    let mut response = Response::new(Body::from(created.bytes));
    *response.status_mut() = StatusCode::CREATED;
    if let Some(content_type) = created.content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}
