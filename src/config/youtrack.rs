//! YouTrack configuration

use reqwest::Url;
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::handlers::IssueIdPattern;

/// YouTrack server and credentials. The section is optional; without it
/// no issue handler is registered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouTrackConfig {
    /// Server root, e.g. `https://youtrack.example.com/`
    pub base_url: String,

    /// Login name
    #[serde(default)]
    pub username: String,

    /// Password
    #[serde(default)]
    pub password: String,

    /// Regex mapping source branches to issue ids, overriding the default
    pub branch_pattern: Option<String>,
}

impl YouTrackConfig {
    /// Branch pattern to use
    pub fn issue_id_pattern(&self) -> Result<IssueIdPattern, ValidationError> {
        match &self.branch_pattern {
            Some(pattern) => IssueIdPattern::new(pattern)
                .map_err(|e| ValidationError::InvalidBranchPattern(e.to_string())),
            None => Ok(IssueIdPattern::default()),
        }
    }

    /// Validate YouTrack configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        Url::parse(&self.base_url).map_err(|e| ValidationError::InvalidUrl {
            field: "youtrack.base_url",
            reason: e.to_string(),
        })?;
        if self.username.is_empty() {
            return Err(ValidationError::MissingRequired("YOUTRACK__USERNAME"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingRequired("YOUTRACK__PASSWORD"));
        }
        self.issue_id_pattern()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> YouTrackConfig {
        YouTrackConfig {
            base_url: "https://yt.example.com/".to_string(),
            username: "bot".to_string(),
            password: "secret".to_string(),
            branch_pattern: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_credentials_required() {
        let config = YouTrackConfig {
            username: String::new(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("YOUTRACK__USERNAME"))
        ));

        let config = YouTrackConfig {
            password: String::new(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("YOUTRACK__PASSWORD"))
        ));
    }

    #[test]
    fn test_branch_pattern_override() {
        let config = YouTrackConfig {
            branch_pattern: Some(r"^issue/([a-z]+)-(\d+)".to_string()),
            ..valid()
        };
        let pattern = config.issue_id_pattern().unwrap();
        assert_eq!(pattern.issue_id("issue/ops-3").as_deref(), Some("OPS-3"));
    }

    #[test]
    fn test_invalid_branch_pattern() {
        let config = YouTrackConfig {
            branch_pattern: Some("feature/(".to_string()),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBranchPattern(_))
        ));
    }
}
