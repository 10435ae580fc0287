//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with defaults
//! suitable for development. A `.env` file is read first when present.
//!
//! # Upstreams
//!
//! - `DIRECTORY_URL`: user directory queried before every relay
//! - `POSTS_URL`: posts service the request is forwarded to
//! - `UPSTREAM_TIMEOUT_SECS`: per-request timeout for both (default: 30)
//!
//! # Authorization Gate
//!
//! - `AUTH_GATE_ENABLED`: wire the `user_id` header gate in front of the relay (default: true)
//! - `AUTH_BYPASS_PATHS`: comma-separated paths that skip the gate (default: `/health,/ready`)

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Default user directory endpoint.
pub const DEFAULT_DIRECTORY_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Default posts service endpoint.
pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Relay will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_request_body_size: usize,

    // =========================================================================
    // Upstream Configuration
    // =========================================================================
    /// User directory endpoint, fetched with GET
    pub directory_url: String,

    /// Posts service endpoint, called with POST
    pub posts_url: String,

    /// Timeout applied to each outbound request
    pub upstream_timeout: Duration,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Whether the `user_id` header gate runs in front of the relay
    pub auth_gate_enabled: bool,

    /// Paths that bypass the gate (exact match)
    pub auth_bypass_paths: Vec<String>,

    /// Allowed CORS origins; "*" allows any
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a value cannot be parsed or fails
    /// validation.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 1024 * 1024)?,

            directory_url: env::var("DIRECTORY_URL")
                .unwrap_or_else(|_| DEFAULT_DIRECTORY_URL.to_string()),
            posts_url: env::var("POSTS_URL").unwrap_or_else(|_| DEFAULT_POSTS_URL.to_string()),
            upstream_timeout: Duration::from_secs(Self::parse_env("UPSTREAM_TIMEOUT_SECS", 30)?),

            auth_gate_enabled: Self::parse_env("AUTH_GATE_ENABLED", true)?,
            auth_bypass_paths: Self::parse_list("AUTH_BYPASS_PATHS", "/health,/ready")
                .into_iter()
                .filter(|p| p.starts_with('/'))
                .collect(),
            cors_allowed_origins: Self::parse_list("CORS_ALLOWED_ORIGINS", "*"),

            metrics_port: Self::parse_env("METRICS_PORT", 9090)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    pub fn validate(&self) -> AppResult<()> {
        for (name, url) in [
            ("DIRECTORY_URL", &self.directory_url),
            ("POSTS_URL", &self.posts_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::ConfigError(format!(
                    "{name} must be an http(s) URL, got {url:?}"
                )));
            }
        }

        if self.upstream_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "UPSTREAM_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the metrics endpoint address, or `None` when disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        (self.metrics_port > 0).then(|| SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .trim()
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    fn parse_list(name: &str, default: &str) -> Vec<String> {
        split_list(&env::var(name).unwrap_or_else(|_| default.to_string()))
    }
}

/// Split a comma-separated value, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Default configuration for testing and development.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: 1024 * 1024,
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            posts_url: DEFAULT_POSTS_URL.to_string(),
            upstream_timeout: Duration::from_secs(30),
            auth_gate_enabled: true,
            auth_bypass_paths: vec!["/health".to_string(), "/ready".to_string()],
            cors_allowed_origins: vec!["*".to_string()],
            metrics_port: 9090,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.directory_url,
            "https://jsonplaceholder.typicode.com/users"
        );
        assert_eq!(
            config.posts_url,
            "https://jsonplaceholder.typicode.com/posts"
        );
        assert!(config.auth_gate_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_metrics_addr_disabled_on_zero() {
        let config = Config {
            metrics_port: 0,
            ..Config::default()
        };
        assert!(config.metrics_addr().is_none());
        assert_eq!(
            Config::default().metrics_addr().map(|a| a.port()),
            Some(9090)
        );
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            posts_url: "ftp://example.com/posts".to_string(),
            ..Config::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("POSTS_URL"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            upstream_timeout: Duration::ZERO,
            ..Config::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_validate_rejects_zero_body_size() {
        let config = Config {
            max_request_body_size: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" /health, ,/ready ,"),
            vec!["/health".to_string(), "/ready".to_string()]
        );
    }
}
