//! GitLab webhook endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::ErrorResponse;
pub use handlers::{
    healthcheck, receive_merge_request_webhook, WebhookError, WebhookState, GITLAB_EVENT_HEADER,
    GITLAB_TOKEN_HEADER, MERGE_REQUEST_HOOK,
};
pub use routes::webhook_router;
