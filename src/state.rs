//! Shared application state for Axum handlers.
//!
//! The state is cloned into every handler invocation. It holds only
//! read-only data: the configuration and the relay with its injected
//! upstream client. Nothing here is mutated after startup, so no locks
//! sit in the request path.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::services::RelayService;
use crate::upstream::{HttpClient, UpstreamClient};

/// Shared application state, generic over the upstream client.
///
/// Production uses the default `HttpClient`; tests may inject any
/// [`UpstreamClient`].
///
/// ```rust,ignore
/// let client = HttpClient::new(&config)?;
/// let state = AppState::new(client, config);
/// ```
#[derive(Clone)]
pub struct AppState<C = HttpClient> {
    /// Relay service used by `POST /`
    pub relay: RelayService<C>,
    /// Application configuration
    pub config: Arc<Config>,
    /// Timestamp when the application started
    pub started_at: Instant,
}

impl<C: UpstreamClient> AppState<C> {
    /// Create application state from an upstream client and configuration.
    pub fn new(client: C, config: Config) -> Self {
        let relay = RelayService::from_config(client, &config);

        Self {
            relay,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds elapsed since the state was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
