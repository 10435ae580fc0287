use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use super::{UpstreamBody, UpstreamClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics;

/// `reqwest`-backed upstream client.
///
/// Cloning is cheap: the inner `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the configured upstream timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> AppResult<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(concat!("post_relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { inner })
    }

    /// Send a prepared request and return the response if its status is 2xx.
    async fn send(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        let started = Instant::now();
        let result = request.send().await;
        let elapsed = started.elapsed().as_secs_f64();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_duration(method, "error", elapsed);
                return Err(map_reqwest_error(url, e));
            }
        };

        let status = response.status();
        metrics::record_upstream_duration(method, status.as_str(), elapsed);
        debug!(url, status = status.as_u16(), elapsed_secs = elapsed, "Upstream responded");

        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Upstream returned error status");
            return Err(AppError::Upstream(format!("{url} returned {status}")));
        }

        Ok(response)
    }
}

impl UpstreamClient for HttpClient {
    #[instrument(skip(self))]
    async fn get_json<T>(&self, url: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = self.send("GET", url, self.inner.get(url)).await?;
        response.json().await.map_err(|e| map_reqwest_error(url, e))
    }

    #[instrument(skip(self, payload))]
    async fn post_json<B>(&self, url: &str, payload: &B) -> AppResult<UpstreamBody>
    where
        B: Serialize + Sync,
    {
        let response = self
            .send("POST", url, self.inner.post(url).json(payload))
            .await?;
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        Ok(UpstreamBody {
            bytes,
            content_type,
        })
    }
}

fn map_reqwest_error(url: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::UpstreamTimeout(format!("{url}: {e}"))
    } else if e.is_decode() {
        AppError::Upstream(format!("{url} returned an unexpected body: {e}"))
    } else {
        AppError::Upstream(format!("{url}: {e}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_timeout(timeout: Duration) -> HttpClient {
        HttpClient::new(&Config {
            upstream_timeout: timeout,
            ..Config::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let users: Value = client
            .get_json(&format!("{}/users", server.uri()))
            .await
            .unwrap();

        assert_eq!(users, json!([{"id": 1}]));
    }

    #[tokio::test]
    async fn test_post_json_sends_payload_and_returns_raw_body() {
        // Keys out of alphabetical order and an id beyond u64/f64 precision
        let created = r#"{"title":"hello","userId":1,"id":123456789012345678901234567890}"#;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(json!({"title": "hello"})))
            .respond_with(ResponseTemplate::new(201).set_body_raw(created, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let body = client
            .post_json(&format!("{}/posts", server.uri()), &json!({"title": "hello"}))
            .await
            .unwrap();

        assert_eq!(body.bytes, created.as_bytes());
        assert_eq!(body.content_type.unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_post_json_accepts_empty_and_non_json_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/text"))
            .respond_with(ResponseTemplate::new(201).set_body_raw("created", "text/plain"))
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let empty = client
            .post_json(&format!("{}/empty", server.uri()), &json!({}))
            .await
            .unwrap();
        let text = client
            .post_json(&format!("{}/text", server.uri()), &json!({}))
            .await
            .unwrap();

        assert!(empty.bytes.is_empty());
        assert_eq!(text.bytes, "created".as_bytes());
        assert_eq!(text.content_type.unwrap(), "text/plain");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let err = client.get_json::<Value>(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_secs(5));
        let err = client.get_json::<Value>(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_slow_upstream_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = client_with_timeout(Duration::from_millis(50));
        let err = client.get_json::<Value>(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppError::UpstreamTimeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_error() {
        // Bind then drop to obtain a port with nothing listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = client_with_timeout(Duration::from_secs(5));
        let err = client
            .get_json::<Value>(&format!("http://127.0.0.1:{port}/users"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)), "got {err:?}");
    }
}
