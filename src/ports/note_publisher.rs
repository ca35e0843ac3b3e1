//! NotePublisher port - Interface for posting the aggregated note.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DispatchContext, Interruption};
use crate::domain::merge_request::MergeRequestId;

/// Port for writing a note on a merge request.
///
/// Exactly one write per call; implementations do not retry.
#[async_trait]
pub trait NotePublisher: Send + Sync {
    /// Publishes `body` as a new note on `target`.
    async fn publish(
        &self,
        ctx: &DispatchContext,
        target: MergeRequestId,
        body: &str,
    ) -> Result<(), PublishError>;
}

/// Publishing failures.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The context ended before the write completed.
    #[error("publish interrupted: {0}")]
    Interrupted(#[from] Interruption),

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The remote rejected the note.
    #[error("bad response status: {0}")]
    Status(u16),

    /// Any other adapter-specific failure.
    #[error("{0}")]
    Other(String),
}
