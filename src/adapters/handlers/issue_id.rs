//! Issue id extraction from merge request branches.

use regex::Regex;
use thiserror::Error;

use crate::domain::merge_request::MergeRequestEvent;

/// Branch naming convention used when none is configured: `feature/xyz982`
/// and `release-fix/XYZ982` both refer to issue `XYZ-982`.
pub const DEFAULT_BRANCH_PATTERN: &str = r"(?i)^(?:feature|release-fix)/([a-z]+)([0-9]+)";

/// Invalid branch pattern.
#[derive(Debug, Error)]
pub enum IssueIdPatternError {
    #[error("invalid branch pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("branch pattern '{0}' needs two capture groups (project, number)")]
    MissingGroups(String),
}

/// Maps a source branch to an issue id.
///
/// The pattern's first capture group is the project short name and the
/// second the issue number; the id is `PROJECT-NUMBER` with the project
/// upper-cased.
#[derive(Debug, Clone)]
pub struct IssueIdPattern {
    regex: Regex,
}

impl IssueIdPattern {
    pub fn new(pattern: &str) -> Result<Self, IssueIdPatternError> {
        let regex = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 3 {
            return Err(IssueIdPatternError::MissingGroups(pattern.to_string()));
        }
        Ok(Self { regex })
    }

    /// Issue id referenced by `branch`, if any.
    pub fn issue_id(&self, branch: &str) -> Option<String> {
        let captures = self.regex.captures(branch)?;
        let project = captures.get(1)?.as_str();
        let number = captures.get(2)?.as_str();
        Some(format!("{}-{}", project.to_uppercase(), number))
    }

    /// Issue id referenced by the event's source branch.
    pub fn extract(&self, event: &MergeRequestEvent) -> Option<String> {
        self.issue_id(event.source_branch())
    }
}

impl Default for IssueIdPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_BRANCH_PATTERN).expect("default branch pattern is valid"),
        }
    }
}
