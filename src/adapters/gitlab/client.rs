//! GitLab REST client adapter.
//!
//! Implements the `NotePublisher` port against the GitLab v4 API.
//!
//! # Configuration
//!
//! ```ignore
//! let client = GitLabClient::new("https://gitlab.com/", private_token)?;
//! client.publish(&ctx, MergeRequestId::new(14, 1), "hello\n").await?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::model::Note;
use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestId;
use crate::ports::{NotePublisher, PublishError};

/// Header carrying the GitLab private token.
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Errors constructing a GitLab client.
#[derive(Debug, Error)]
pub enum GitLabError {
    #[error("invalid GitLab base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Client for the GitLab v4 REST API.
pub struct GitLabClient {
    http: Client,
    api_url: Url,
    private_token: SecretString,
}

impl GitLabClient {
    /// Creates a client for the GitLab server at `base_url`
    /// (e.g. `https://gitlab.com/`).
    ///
    /// An empty token is accepted but logged: every note request will fail.
    pub fn new(base_url: &str, private_token: impl Into<String>) -> Result<Self, GitLabError> {
        Self::with_http_client(base_url, private_token, Client::new())
    }

    /// Creates a client with a preconfigured HTTP client.
    pub fn with_http_client(
        base_url: &str,
        private_token: impl Into<String>,
        http: Client,
    ) -> Result<Self, GitLabError> {
        let raw = format!("{}/api/v4/", base_url.trim_end_matches('/'));
        let api_url = Url::parse(&raw).map_err(|e| GitLabError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let private_token = private_token.into();
        if private_token.is_empty() {
            tracing::warn!(
                "Using an empty GitLab private token, note requests will likely fail"
            );
        }

        Ok(Self {
            http,
            api_url,
            private_token: SecretString::new(private_token),
        })
    }

    /// Resolved `/api/v4/` root.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn notes_url(&self, target: MergeRequestId) -> Result<Url, PublishError> {
        let path = format!(
            "projects/{}/merge_requests/{}/notes",
            target.project_id, target.iid
        );
        self.api_url
            .join(&path)
            .map_err(|e| PublishError::Other(format!("could not resolve path {path}: {e}")))
    }
}

#[async_trait]
impl NotePublisher for GitLabClient {
    async fn publish(
        &self,
        ctx: &DispatchContext,
        target: MergeRequestId,
        body: &str,
    ) -> Result<(), PublishError> {
        let url = self.notes_url(target)?;
        let request = self
            .http
            .post(url.clone())
            .header(PRIVATE_TOKEN_HEADER, self.private_token.expose_secret())
            .json(&Note { body });

        let response = ctx
            .run(request.send())
            .await?
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "POST merge request note");

        if !status.is_success() {
            return Err(PublishError::Status(status.as_u16()));
        }
        Ok(())
    }
}
