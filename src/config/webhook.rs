//! Webhook configuration

use serde::Deserialize;

/// Inbound webhook settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Secret GitLab sends in `X-Gitlab-Token`. When unset every request
    /// is accepted.
    pub token: Option<String>,
}

impl WebhookConfig {
    /// The configured token, treating an empty value as unset
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}
