//! Handler selection configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::merge_request::MergeRequestAction;

/// Which actions to handle and which optional handlers to register
#[derive(Debug, Clone, Deserialize)]
pub struct HandlersConfig {
    /// Merge request actions handlers are registered for (comma-separated)
    #[serde(default = "default_actions")]
    pub actions: String,

    /// Fixed text appended to every note
    pub message: Option<String>,

    /// URL whose contents are appended to every note
    pub url_file: Option<String>,
}

impl HandlersConfig {
    /// Get actions as a list
    pub fn actions_list(&self) -> Vec<MergeRequestAction> {
        self.actions
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(MergeRequestAction::from)
            .collect()
    }

    /// Validate handler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.actions_list().is_empty() {
            return Err(ValidationError::NoActions);
        }
        if let Some(url) = &self.url_file {
            reqwest::Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
                field: "handlers.url_file",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            message: None,
            url_file: None,
        }
    }
}

fn default_actions() -> String {
    "open".to_string()
}
