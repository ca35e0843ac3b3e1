//! HTTP handlers for the GitLab webhook endpoint.
//!
//! The webhook is acknowledged as soon as it is validated; relaying runs on
//! a background task bounded by its own `DispatchContext`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::response::IntoResponse;
use http::{HeaderMap, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::dto::ErrorResponse;
use crate::adapters::gitlab::MergeRequestWebhook;
use crate::application::handlers::{
    RelayMergeRequestCommand, RelayMergeRequestHandler, RelayMergeRequestResult,
};
use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestEvent;

/// Shared secret configured on the GitLab webhook.
pub const GITLAB_TOKEN_HEADER: &str = "X-Gitlab-Token";

/// Kind of webhook being delivered.
pub const GITLAB_EVENT_HEADER: &str = "X-Gitlab-Event";

/// `X-Gitlab-Event` value of merge request webhooks.
pub const MERGE_REQUEST_HOOK: &str = "Merge Request Hook";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// State shared by the webhook handlers.
#[derive(Clone)]
pub struct WebhookState {
    relay: Arc<RelayMergeRequestHandler>,
    webhook_token: Option<Arc<SecretString>>,
    relay_timeout: Duration,
    shutdown: CancellationToken,
}

impl WebhookState {
    /// Creates the state. Without a `webhook_token` every request is accepted.
    pub fn new(
        relay: Arc<RelayMergeRequestHandler>,
        webhook_token: Option<String>,
        relay_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            relay,
            webhook_token: webhook_token.map(|t| Arc::new(SecretString::new(t))),
            relay_timeout,
            shutdown,
        }
    }

    fn verify_token(&self, headers: &HeaderMap) -> Result<(), WebhookError> {
        let Some(expected) = &self.webhook_token else {
            return Ok(());
        };
        let provided = headers
            .get(GITLAB_TOKEN_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();

        let matches: bool = provided.ct_eq(expected.expose_secret().as_bytes()).into();
        if matches {
            Ok(())
        } else {
            Err(WebhookError::InvalidToken)
        }
    }

    /// Relays `event` on a background task with a fresh deadline.
    ///
    /// The task's context is a child of the shutdown token, so stopping the
    /// server interrupts relays in flight.
    pub fn spawn_relay(&self, event: MergeRequestEvent) -> JoinHandle<()> {
        let ctx = DispatchContext::child_of(&self.shutdown, self.relay_timeout);
        let relay = self.relay.clone();

        tokio::spawn(async move {
            let target = event.target();
            match relay.handle(&ctx, RelayMergeRequestCommand { event }).await {
                Ok(RelayMergeRequestResult::Published { failures, .. }) if !failures.is_empty() => {
                    tracing::warn!(
                        merge_request = %target,
                        failures = failures.len(),
                        "Published note without the output of failed handlers"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(merge_request = %target, error = %e, "Error handling merge request webhook");
                }
            }
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /` - GitLab merge request webhook.
pub async fn receive_merge_request_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    state.verify_token(&headers)?;

    let kind = headers
        .get(GITLAB_EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if kind != MERGE_REQUEST_HOOK {
        return Err(WebhookError::UnsupportedEvent(kind.to_string()));
    }

    let webhook: MergeRequestWebhook =
        serde_json::from_slice(&body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    let event = webhook.into_event();

    tracing::info!(
        action = %event.action(),
        project_id = event.target().project_id,
        iid = event.target().iid,
        source_branch = event.source_branch(),
        "Received merge request webhook"
    );

    state.spawn_relay(event);
    Ok(StatusCode::OK)
}

/// `GET /healthcheck` - Liveness probe.
pub async fn healthcheck() -> &'static str {
    "OK"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Rejections of a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook token")]
    InvalidToken,

    #[error("unsupported webhook event '{0}'")]
    UnsupportedEvent(String),

    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self {
            WebhookError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            WebhookError::UnsupportedEvent(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_EVENT"),
            WebhookError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
        };
        tracing::info!(status = status.as_u16(), error = %self, "Rejected webhook");

        (status, Json(ErrorResponse::new(error_code, self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gitlab::InMemoryNotePublisher;
    use crate::application::dispatch::HandlerRegistry;
    use http::HeaderValue;

    fn state(token: Option<&str>) -> WebhookState {
        let relay = RelayMergeRequestHandler::new(
            Arc::new(HandlerRegistry::new()),
            Arc::new(InMemoryNotePublisher::new()),
        );
        WebhookState::new(
            Arc::new(relay),
            token.map(str::to_string),
            Duration::from_secs(1),
            CancellationToken::new(),
        )
    }

    fn headers_with_token(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(GITLAB_TOKEN_HEADER, HeaderValue::from_static(token));
        headers
    }

    #[test]
    fn any_request_passes_without_configured_token() {
        assert!(state(None).verify_token(&HeaderMap::new()).is_ok());
        assert!(state(None).verify_token(&headers_with_token("x")).is_ok());
    }

    #[test]
    fn configured_token_must_match_exactly() {
        let state = state(Some("s3cret"));

        assert!(state.verify_token(&headers_with_token("s3cret")).is_ok());
        assert!(matches!(
            state.verify_token(&headers_with_token("s3cre")),
            Err(WebhookError::InvalidToken)
        ));
        assert!(matches!(
            state.verify_token(&headers_with_token("s3cret!")),
            Err(WebhookError::InvalidToken)
        ));
        assert!(matches!(
            state.verify_token(&HeaderMap::new()),
            Err(WebhookError::InvalidToken)
        ));
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            WebhookError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::UnsupportedEvent("Push Hook".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidPayload("eof".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
