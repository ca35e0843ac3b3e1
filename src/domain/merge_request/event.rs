//! Merge request events as seen by handlers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened to a merge request.
///
/// GitLab sends these as lower-case strings in `object_attributes.action`.
/// Unknown values are kept verbatim so handlers can still be registered for
/// actions this crate does not name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MergeRequestAction {
    Open,
    Close,
    Reopen,
    Update,
    Merge,
    Approved,
    Unapproved,
    Other(String),
}

impl MergeRequestAction {
    /// Wire representation of the action.
    pub fn as_str(&self) -> &str {
        match self {
            MergeRequestAction::Open => "open",
            MergeRequestAction::Close => "close",
            MergeRequestAction::Reopen => "reopen",
            MergeRequestAction::Update => "update",
            MergeRequestAction::Merge => "merge",
            MergeRequestAction::Approved => "approved",
            MergeRequestAction::Unapproved => "unapproved",
            MergeRequestAction::Other(s) => s,
        }
    }
}

impl From<&str> for MergeRequestAction {
    fn from(s: &str) -> Self {
        match s {
            "open" => MergeRequestAction::Open,
            "close" => MergeRequestAction::Close,
            "reopen" => MergeRequestAction::Reopen,
            "update" => MergeRequestAction::Update,
            "merge" => MergeRequestAction::Merge,
            "approved" => MergeRequestAction::Approved,
            "unapproved" => MergeRequestAction::Unapproved,
            other => MergeRequestAction::Other(other.to_string()),
        }
    }
}

impl From<String> for MergeRequestAction {
    fn from(s: String) -> Self {
        MergeRequestAction::from(s.as_str())
    }
}

impl From<MergeRequestAction> for String {
    fn from(action: MergeRequestAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for MergeRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies where a note is published.
///
/// `iid` is the project-scoped merge request number, not the global id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRequestId {
    /// Id of the project the merge request targets.
    pub project_id: i64,
    /// Project-scoped merge request number.
    pub iid: i64,
}

impl MergeRequestId {
    pub fn new(project_id: i64, iid: i64) -> Self {
        Self { project_id, iid }
    }
}

impl fmt::Display for MergeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.project_id, self.iid)
    }
}

/// An inbound merge request event.
///
/// Built once by the boundary layer and shared read-only with every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestEvent {
    action: MergeRequestAction,
    source_branch: String,
    target: MergeRequestId,
}

impl MergeRequestEvent {
    pub fn new(
        action: impl Into<MergeRequestAction>,
        source_branch: impl Into<String>,
        target: MergeRequestId,
    ) -> Self {
        Self {
            action: action.into(),
            source_branch: source_branch.into(),
            target,
        }
    }

    pub fn action(&self) -> &MergeRequestAction {
        &self.action
    }

    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    pub fn target(&self) -> MergeRequestId {
        self.target
    }
}
