//! Axum router for the webhook endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{healthcheck, receive_merge_request_webhook, WebhookState};

/// Upper bound for reading and validating one delivery. Relaying is not
/// included; it runs after the response.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the webhook router.
///
/// # Routes
/// - `POST /` - GitLab merge request webhook
/// - `GET /healthcheck` - Liveness probe
pub fn webhook_router(state: WebhookState) -> Router {
    Router::new()
        .route("/", post(receive_merge_request_webhook))
        .route("/healthcheck", get(healthcheck))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
