use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::metrics;
use crate::models::{Post, User, find_user};
use crate::upstream::{UpstreamBody, UpstreamClient};

/// Result of relaying one post.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// The author exists; carries the posts service response body verbatim.
    Forwarded(UpstreamBody),
    /// No directory user matched the post's `userId`.
    UnknownUser,
}

/// Validates a post's author against the user directory, then forwards it.
///
/// Each call fetches the directory fresh; nothing is cached between requests.
/// The POST is only issued after the GET has completed and matched.
#[derive(Clone)]
pub struct RelayService<C> {
    client: C,
    directory_url: Arc<str>,
    posts_url: Arc<str>,
}

impl<C: UpstreamClient> RelayService<C> {
    /// Create a relay over an injected client and the two upstream URLs.
    pub fn new(
        client: C,
        directory_url: impl Into<Arc<str>>,
        posts_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            client,
            directory_url: directory_url.into(),
            posts_url: posts_url.into(),
        }
    }

    /// Create a relay using the upstream URLs from `config`.
    pub fn from_config(client: C, config: &Config) -> Self {
        Self::new(client, config.directory_url.as_str(), config.posts_url.as_str())
    }

    /// Relay a post: fetch the directory, match the author, forward on match.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` / `AppError::UpstreamTimeout` if either
    /// outbound call fails. No POST is issued when the directory fetch fails.
    #[instrument(skip(self, post), fields(user_id = %post.user_id))]
    pub async fn relay(&self, post: &Post) -> AppResult<RelayOutcome> {
        let result = self.relay_inner(post).await;

        metrics::record_relay_outcome(match &result {
            Ok(RelayOutcome::Forwarded(_)) => "forwarded",
            Ok(RelayOutcome::UnknownUser) => "unknown_user",
            Err(_) => "upstream_error",
        });

        result
    }

    async fn relay_inner(&self, post: &Post) -> AppResult<RelayOutcome> {
        let users: Vec<User> = self.client.get_json(&self.directory_url).await?;

        if find_user(&users, post.user_id).is_none() {
            warn!(directory_size = users.len(), "Post author not found in directory");
            return Ok(RelayOutcome::UnknownUser);
        }

        let created = self.client.post_json(&self.posts_url, post).await?;
        info!("Post forwarded to posts service");

        Ok(RelayOutcome::Forwarded(created))
    }
}
