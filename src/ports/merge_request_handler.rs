//! MergeRequestHandler port - Interface for units of behavior run on merge request events.
//!
//! Handlers inspect an event and optionally contribute a text fragment to the
//! note posted back on the merge request.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DispatchContext, Interruption};
use crate::domain::merge_request::MergeRequestEvent;

/// Handler for merge request events.
///
/// Implementations must:
/// - **Honor the context** - return `HandlerError::Interrupted` once `ctx` is done
/// - **Not retain the event** - it is shared read-only with sibling handlers
/// - **Be independent** - errors never affect other handlers
///
/// # Example
///
/// ```ignore
/// struct Greeter;
///
/// #[async_trait]
/// impl MergeRequestHandler for Greeter {
///     async fn handle(
///         &self,
///         _ctx: &DispatchContext,
///         event: &MergeRequestEvent,
///     ) -> Result<String, HandlerError> {
///         Ok(format!("Thanks for {}!", event.source_branch()))
///     }
///
///     fn name(&self) -> &'static str {
///         "Greeter"
///     }
/// }
/// ```
#[async_trait]
pub trait MergeRequestHandler: Send + Sync {
    /// Produces a fragment for the note. An empty fragment contributes nothing.
    async fn handle(
        &self,
        ctx: &DispatchContext,
        event: &MergeRequestEvent,
    ) -> Result<String, HandlerError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Errors a single handler invocation can end with.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The dispatch context ended before the handler produced a result.
    #[error("{0}")]
    Interrupted(#[from] Interruption),

    /// The handler task panicked or was aborted.
    #[error("handler task aborted: {0}")]
    Aborted(String),

    /// The handler failed on its own terms.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HandlerError {
    /// Creates a failure with only a message.
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a failure wrapping an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        HandlerError::Failed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True when the dispatch deadline ran out for this handler.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(
            self,
            HandlerError::Interrupted(Interruption::DeadlineExceeded)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn MergeRequestHandler) {}

    #[test]
    fn deadline_interruption_is_detected() {
        let err = HandlerError::from(Interruption::DeadlineExceeded);
        assert!(err.is_deadline_exceeded());
        assert_eq!(err.to_string(), "deadline exceeded");

        assert!(!HandlerError::from(Interruption::Cancelled).is_deadline_exceeded());
        assert!(!HandlerError::failed("boom").is_deadline_exceeded());
    }

    #[test]
    fn failure_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = HandlerError::with_source("could not fetch file", io);

        assert_eq!(err.to_string(), "could not fetch file");
        assert_eq!(err.source().unwrap().to_string(), "socket closed");
    }
}
