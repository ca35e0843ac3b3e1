//! In-memory note publisher for testing.
//!
//! Records every publish for assertions and can be told to fail.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestId;
use crate::ports::{NotePublisher, PublishError};

/// A note captured by `InMemoryNotePublisher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedNote {
    pub target: MergeRequestId,
    pub body: String,
}

/// Note publisher that keeps notes in memory.
#[derive(Default)]
pub struct InMemoryNotePublisher {
    notes: Mutex<Vec<PublishedNote>>,
    attempts: Mutex<usize>,
    fail_status: Mutex<Option<u16>>,
}

impl InMemoryNotePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following publish fail with `PublishError::Status(status)`.
    pub fn fail_with_status(&self, status: u16) {
        *self
            .fail_status
            .lock()
            .expect("InMemoryNotePublisher: fail_status lock poisoned") = Some(status);
    }

    /// Notes published successfully.
    pub fn notes(&self) -> Vec<PublishedNote> {
        self.notes
            .lock()
            .expect("InMemoryNotePublisher: notes lock poisoned")
            .clone()
    }

    /// Number of publish calls, successful or not.
    pub fn publish_count(&self) -> usize {
        *self
            .attempts
            .lock()
            .expect("InMemoryNotePublisher: attempts lock poisoned")
    }
}

#[async_trait]
impl NotePublisher for InMemoryNotePublisher {
    async fn publish(
        &self,
        ctx: &DispatchContext,
        target: MergeRequestId,
        body: &str,
    ) -> Result<(), PublishError> {
        *self
            .attempts
            .lock()
            .expect("InMemoryNotePublisher: attempts lock poisoned") += 1;

        if let Some(reason) = ctx.err() {
            return Err(PublishError::Interrupted(reason));
        }
        if let Some(status) = *self
            .fail_status
            .lock()
            .expect("InMemoryNotePublisher: fail_status lock poisoned")
        {
            return Err(PublishError::Status(status));
        }

        self.notes
            .lock()
            .expect("InMemoryNotePublisher: notes lock poisoned")
            .push(PublishedNote {
                target,
                body: body.to_string(),
            });
        Ok(())
    }
}
