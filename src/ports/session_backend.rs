//! SessionBackend port - Interface for APIs that authenticate with ambient session state.
//!
//! A login establishes state (typically a cookie) on the backend's HTTP client
//! that the following request relies on. Two interleaved logins would race on
//! that state, so callers go through a `SessionGate` rather than calling the
//! backend directly.

use async_trait::async_trait;

/// A login-then-request backend.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Description of one request to perform after login.
    type Request: Send;

    /// Result of a successful request.
    type Response: Send;

    /// Backend failure, used for both the login and the request step.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Establishes the session.
    async fn login(&self) -> Result<(), Self::Error>;

    /// Performs `request` within the established session.
    async fn send(&self, request: Self::Request) -> Result<Self::Response, Self::Error>;
}
