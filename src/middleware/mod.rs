//! HTTP middleware in front of the relay.
//!
//! ```text
//! Request → Request ID → Trace → user_id Gate → Handler → Response
//!                                     ↓
//!                               403 Forbidden
//! ```
//!
//! Request IDs and tracing come from `tower-http`; see `routes.rs`.

pub mod gate;

pub use gate::{AUTHORIZED_USER_ID, AuthorizationDecision, USER_ID_HEADER, UserIdGate};
