//! # Post Relay
//!
//! A small Axum service that accepts post-creation requests, confirms the
//! author exists in an upstream user directory, and forwards the post to an
//! upstream posts service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Request ID → Trace → user_id Gate)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (POST /, /health, /ready)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RelayService (GET directory → match → POST posts)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UpstreamClient (HttpClient over reqwest)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use post_relay::{AppState, Config, HttpClient, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = HttpClient::new(&config)?;
//!     let app = build_router(AppState::new(client, config));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Authorization
//!
//! Requests to `POST /` must carry `user_id: 1`. Disable the gate with:
//! ```bash
//! AUTH_GATE_ENABLED=false cargo run
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod upstream;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::build_router;
pub use services::{RelayOutcome, RelayService};
pub use state::AppState;
pub use upstream::{HttpClient, UpstreamBody, UpstreamClient};
