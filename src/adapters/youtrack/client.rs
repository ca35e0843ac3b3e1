//! YouTrack client adapter.
//!
//! YouTrack's legacy REST API authenticates with a session cookie set by
//! `POST rest/user/login`. The cookie lives in the HTTP client's cookie
//! store, so every lookup runs as a login+request cycle through a
//! `SessionGate` to keep concurrent lookups from interleaving logins.
//!
//! # Configuration
//!
//! ```ignore
//! let client = YouTrackClient::new("https://youtrack.example.com/", "bot", password)?;
//! let issue = client.get_issue(&ctx, "XYZ-982").await?;
//! ```

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Request, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use super::error::YouTrackError;
use super::model::Issue;
use crate::adapters::session::{SessionError, SessionGate};
use crate::domain::foundation::DispatchContext;
use crate::ports::{IssueTracker, IssueTrackerError, SessionBackend, TrackedIssue};

/// Cookie-authenticated YouTrack session.
///
/// Only meaningful behind a `SessionGate`.
pub struct YouTrackSession {
    http: Client,
    login_url: Url,
    username: String,
    password: SecretString,
}

#[async_trait]
impl SessionBackend for YouTrackSession {
    type Request = Request;
    type Response = Response;
    type Error = YouTrackError;

    async fn login(&self) -> Result<(), YouTrackError> {
        let response = self
            .http
            .post(self.login_url.clone())
            .query(&[
                ("login", self.username.as_str()),
                ("password", self.password.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| YouTrackError::Network(e.to_string()))?;

        tracing::debug!(status = response.status().as_u16(), "YouTrack login");

        if response.status() != StatusCode::OK {
            return Err(YouTrackError::Status(response.status()));
        }
        Ok(())
    }

    async fn send(&self, request: Request) -> Result<Response, YouTrackError> {
        let method = request.method().clone();
        let url = request.url().clone();
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| YouTrackError::Network(e.to_string()))?;

        tracing::debug!(%method, url = %url, status = response.status().as_u16(), "YouTrack request");

        if !response.status().is_success() {
            return Err(YouTrackError::Status(response.status()));
        }
        Ok(response)
    }
}

/// Client for a YouTrack server.
pub struct YouTrackClient {
    base_url: Url,
    gate: SessionGate<YouTrackSession>,
}

impl YouTrackClient {
    /// Creates a client. Both credentials are required.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, YouTrackError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(YouTrackError::MissingCredentials);
        }

        let base_url = parse_base_url(base_url)?;
        let login_url = join(&base_url, "rest/user/login")?;
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| YouTrackError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            gate: SessionGate::new(YouTrackSession {
                http,
                login_url,
                username,
                password: SecretString::new(password),
            }),
        })
    }

    /// Server root all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches and decodes an issue, one gated login+request cycle.
    pub async fn fetch_issue(
        &self,
        ctx: &DispatchContext,
        issue_id: &str,
    ) -> Result<Issue, SessionError<YouTrackError>> {
        let url = join(&self.base_url, &format!("rest/issue/{issue_id}"))
            .map_err(SessionError::Request)?;
        let request = self
            .gate
            .backend()
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .build()
            .map_err(|e| SessionError::Request(YouTrackError::Network(e.to_string())))?;

        let response = self.gate.do_with_session(ctx, request).await?;

        ctx.run(response.json::<Issue>())
            .await
            .map_err(SessionError::Interrupted)?
            .map_err(|e| SessionError::Request(YouTrackError::Decode(e.to_string())))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, YouTrackError> {
    let mut raw = raw.to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| YouTrackError::InvalidUrl(format!("{raw}: {e}")))
}

fn join(base: &Url, path: &str) -> Result<Url, YouTrackError> {
    base.join(path)
        .map_err(|e| YouTrackError::InvalidUrl(format!("{path}: {e}")))
}

#[async_trait]
impl IssueTracker for YouTrackClient {
    fn issue_url(&self, issue_id: &str) -> Result<String, IssueTrackerError> {
        join(&self.base_url, &format!("issue/{issue_id}"))
            .map(String::from)
            .map_err(|e| IssueTrackerError::Request(e.to_string()))
    }

    async fn get_issue(
        &self,
        ctx: &DispatchContext,
        issue_id: &str,
    ) -> Result<TrackedIssue, IssueTrackerError> {
        let issue = self.fetch_issue(ctx, issue_id).await.map_err(|e| match e {
            SessionError::Interrupted(reason) => IssueTrackerError::Interrupted(reason),
            SessionError::Login(e) => IssueTrackerError::Login(e.to_string()),
            SessionError::Request(e) if e.is_status(StatusCode::NOT_FOUND) => {
                IssueTrackerError::NotFound(issue_id.to_string())
            }
            SessionError::Request(e) => IssueTrackerError::Request(e.to_string()),
            SessionError::Closed => IssueTrackerError::Request("session gate closed".to_string()),
        })?;

        let summary = issue
            .field_string_value("summary")
            .map_err(|e| IssueTrackerError::InvalidIssue(e.to_string()))?;
        let description = issue.optional_string_value("description");

        Ok(TrackedIssue {
            id: issue_id.to_string(),
            summary: summary.to_string(),
            description: description.map(str::to_string),
        })
    }
}
