//! GitLab configuration

use reqwest::Url;
use serde::Deserialize;

use super::error::ValidationError;

/// GitLab server and API credentials
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabConfig {
    /// Server root, e.g. `https://gitlab.com/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Private token used to post notes. Empty is accepted but every
    /// publish will be rejected by GitLab.
    #[serde(default)]
    pub private_token: String,
}

impl GitLabConfig {
    /// Validate GitLab configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        Url::parse(&self.base_url).map_err(|e| ValidationError::InvalidUrl {
            field: "gitlab.base_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            private_token: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://gitlab.com/".to_string()
}
