//! Handler that summarizes the issue a merge request's branch refers to.

use std::sync::Arc;

use async_trait::async_trait;

use super::issue_id::IssueIdPattern;
use crate::domain::foundation::DispatchContext;
use crate::domain::markdown::{escape_gitlab_references, markdown_quote};
use crate::domain::merge_request::MergeRequestEvent;
use crate::ports::{HandlerError, IssueTracker, IssueTrackerError, MergeRequestHandler};

/// Contributes the title, link and description of the referenced issue.
///
/// Produces nothing when the branch names no issue or the issue does not
/// exist.
pub struct YouTrackIssueHandler {
    tracker: Arc<dyn IssueTracker>,
    pattern: IssueIdPattern,
}

impl YouTrackIssueHandler {
    pub fn new(tracker: Arc<dyn IssueTracker>, pattern: IssueIdPattern) -> Self {
        Self { tracker, pattern }
    }
}

#[async_trait]
impl MergeRequestHandler for YouTrackIssueHandler {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        event: &MergeRequestEvent,
    ) -> Result<String, HandlerError> {
        let Some(issue_id) = self.pattern.extract(event) else {
            return Ok(String::new());
        };

        let url = self
            .tracker
            .issue_url(&issue_id)
            .map_err(|e| HandlerError::with_source(format!("could not build URL for {issue_id}"), e))?;

        let issue = match self.tracker.get_issue(ctx, &issue_id).await {
            Ok(issue) => issue,
            Err(IssueTrackerError::NotFound(_)) => {
                tracing::debug!(issue_id = %issue_id, "Referenced issue does not exist");
                return Ok(String::new());
            }
            Err(IssueTrackerError::Interrupted(reason)) => return Err(reason.into()),
            Err(e) => {
                return Err(HandlerError::with_source(
                    format!("could not fetch issue {issue_id}"),
                    e,
                ))
            }
        };

        let summary = escape_gitlab_references(&issue.summary);
        let description = issue
            .description
            .as_deref()
            .map(|d| markdown_quote(&escape_gitlab_references(d)))
            .unwrap_or_default();

        Ok(format!("# {issue_id}: {summary}\n{url}\n\n{description}\n"))
    }

    fn name(&self) -> &'static str {
        "YouTrackIssueHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Interruption;
    use crate::domain::merge_request::MergeRequestId;
    use crate::ports::TrackedIssue;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Tracker serving a fixed set of issues.
    #[derive(Default)]
    struct StubTracker {
        issues: HashMap<String, TrackedIssue>,
        failure: Option<fn() -> IssueTrackerError>,
        lookups: Mutex<Vec<String>>,
    }

    impl StubTracker {
        fn with_issue(mut self, id: &str, summary: &str, description: Option<&str>) -> Self {
            self.issues.insert(
                id.to_string(),
                TrackedIssue {
                    id: id.to_string(),
                    summary: summary.to_string(),
                    description: description.map(str::to_string),
                },
            );
            self
        }

        fn failing(failure: fn() -> IssueTrackerError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl IssueTracker for StubTracker {
        fn issue_url(&self, issue_id: &str) -> Result<String, IssueTrackerError> {
            Ok(format!("https://yt.example.com/issue/{issue_id}"))
        }

        async fn get_issue(
            &self,
            _ctx: &DispatchContext,
            issue_id: &str,
        ) -> Result<TrackedIssue, IssueTrackerError> {
            self.lookups.lock().unwrap().push(issue_id.to_string());
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            self.issues
                .get(issue_id)
                .cloned()
                .ok_or_else(|| IssueTrackerError::NotFound(issue_id.to_string()))
        }
    }

    fn event(branch: &str) -> MergeRequestEvent {
        MergeRequestEvent::new("open", branch, MergeRequestId::new(14, 1))
    }

    fn ctx() -> DispatchContext {
        DispatchContext::with_timeout(Duration::from_secs(5))
    }

    async fn run(tracker: StubTracker, branch: &str) -> (Result<String, HandlerError>, Vec<String>) {
        let tracker = Arc::new(tracker);
        let handler = YouTrackIssueHandler::new(tracker.clone(), IssueIdPattern::default());
        let result = handler.handle(&ctx(), &event(branch)).await;
        let lookups = tracker.lookups.lock().unwrap().clone();
        (result, lookups)
    }

    #[tokio::test]
    async fn formats_referenced_issue() {
        let tracker = StubTracker::default().with_issue(
            "XYZ-982",
            "Login fails for @admin",
            Some("Steps:\n1. open #12"),
        );

        let (result, lookups) = run(tracker, "feature/xyz982-login").await;

        assert_eq!(
            result.unwrap(),
            "# XYZ-982: Login fails for `@`admin\n\
             https://yt.example.com/issue/XYZ-982\n\
             \n\
             > Steps:\n\
             > 1. open `#`12\n"
        );
        assert_eq!(lookups, vec!["XYZ-982"]);
    }

    #[tokio::test]
    async fn missing_description_leaves_body_empty() {
        let tracker = StubTracker::default().with_issue("ABC-7", "Tidy up", None);

        let (result, _) = run(tracker, "release-fix/abc7").await;

        assert_eq!(
            result.unwrap(),
            "# ABC-7: Tidy up\nhttps://yt.example.com/issue/ABC-7\n\n\n"
        );
    }

    #[tokio::test]
    async fn branch_without_issue_contributes_nothing() {
        let (result, lookups) = run(StubTracker::default(), "hotfix/urgent").await;

        assert_eq!(result.unwrap(), "");
        assert!(lookups.is_empty());
    }

    #[tokio::test]
    async fn unknown_issue_contributes_nothing() {
        let (result, lookups) = run(StubTracker::default(), "feature/xyz1").await;

        assert_eq!(result.unwrap(), "");
        assert_eq!(lookups, vec!["XYZ-1"]);
    }

    #[tokio::test]
    async fn tracker_failure_is_an_error() {
        let tracker = StubTracker::failing(|| IssueTrackerError::Login("bad status".into()));

        let (result, _) = run(tracker, "feature/xyz1").await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "could not fetch issue XYZ-1");
        assert!(!err.is_deadline_exceeded());
    }

    #[tokio::test]
    async fn interruption_is_passed_through() {
        let tracker =
            StubTracker::failing(|| IssueTrackerError::Interrupted(Interruption::DeadlineExceeded));

        let (result, _) = run(tracker, "feature/xyz1").await;

        assert!(result.unwrap_err().is_deadline_exceeded());
    }
}
