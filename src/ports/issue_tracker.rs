//! IssueTracker port - Interface for looking up issues referenced by a merge request.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DispatchContext, Interruption};

/// An issue as needed for the merge request note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedIssue {
    /// Tracker-specific id, e.g. `XYZ-982`.
    pub id: String,
    /// One-line summary. Always present.
    pub summary: String,
    /// Free-form description, if the issue has one.
    pub description: Option<String>,
}

/// Port for read access to an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Browsable (non-API) URL of the issue. Does not contact the tracker.
    fn issue_url(&self, issue_id: &str) -> Result<String, IssueTrackerError>;

    /// Fetches the issue.
    async fn get_issue(
        &self,
        ctx: &DispatchContext,
        issue_id: &str,
    ) -> Result<TrackedIssue, IssueTrackerError>;
}

/// Issue tracker failures.
#[derive(Debug, Error)]
pub enum IssueTrackerError {
    /// The tracker has no issue with this id.
    #[error("issue not found: {0}")]
    NotFound(String),

    /// The context ended before the lookup completed.
    #[error("{0}")]
    Interrupted(#[from] Interruption),

    /// Logging in to the tracker failed.
    #[error("login failed: {0}")]
    Login(String),

    /// The tracker answered with something unusable.
    #[error("invalid issue: {0}")]
    InvalidIssue(String),

    /// Transport or unexpected status failures.
    #[error("tracker request failed: {0}")]
    Request(String),
}
