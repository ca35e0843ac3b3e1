//! YouTrack adapter errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to YouTrack.
#[derive(Debug, Error)]
pub enum YouTrackError {
    /// The server answered with an unexpected status.
    #[error("bad response status: {0}")]
    Status(StatusCode),

    /// The request could not be sent or the response not read.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not a valid issue.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A URL could not be built from the configured base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Username or password is empty.
    #[error("YouTrack credentials are required")]
    MissingCredentials,

    /// A required issue field is absent or not a string.
    #[error("issue field '{0}' is missing or not a string")]
    MissingField(String),
}

impl YouTrackError {
    /// True when this error is an unexpected `status` response.
    pub fn is_status(&self, status: StatusCode) -> bool {
        matches!(self, YouTrackError::Status(s) if *s == status)
    }
}
