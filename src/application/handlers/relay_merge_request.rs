//! RelayMergeRequestHandler - Command handler that turns one merge request event into at most one note.
//!
//! Flow: registry lookup → dispatch → publish (only when the aggregate is non-empty).

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::application::dispatch::{DispatchEngine, HandlerFailure, HandlerRegistry};
use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestEvent;
use crate::ports::{NotePublisher, PublishError};

/// Command to relay a merge request event.
#[derive(Debug, Clone)]
pub struct RelayMergeRequestCommand {
    pub event: MergeRequestEvent,
}

/// Result of relaying an event.
#[derive(Debug)]
pub enum RelayMergeRequestResult {
    /// No handler is registered for the event's action.
    NoHandlers,
    /// Handlers ran but produced no text; nothing was published.
    NothingToPublish { failures: Vec<HandlerFailure> },
    /// The aggregated note was published.
    Published {
        body: String,
        failures: Vec<HandlerFailure>,
    },
}

/// Time allowed for publishing the note once dispatch has finished.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Handler for relaying merge request events to registered handlers.
pub struct RelayMergeRequestHandler {
    registry: Arc<HandlerRegistry>,
    engine: DispatchEngine,
    publisher: Arc<dyn NotePublisher>,
    publish_timeout: Duration,
}

impl RelayMergeRequestHandler {
    pub fn new(registry: Arc<HandlerRegistry>, publisher: Arc<dyn NotePublisher>) -> Self {
        Self {
            registry,
            engine: DispatchEngine::new(),
            publisher,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Overrides the time allowed for publishing the note.
    pub fn with_publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout = timeout;
        self
    }

    /// Relays `cmd.event`. Only a failed publish is an error; handler
    /// failures are logged and returned inside the result.
    #[instrument(
        name = "relay_merge_request",
        skip_all,
        fields(action = %cmd.event.action(), merge_request = %cmd.event.target())
    )]
    pub async fn handle(
        &self,
        ctx: &DispatchContext,
        cmd: RelayMergeRequestCommand,
    ) -> Result<RelayMergeRequestResult, PublishError> {
        let event = cmd.event;

        let Some(handlers) = self.registry.lookup(event.action()) else {
            tracing::debug!("No handlers for action");
            return Ok(RelayMergeRequestResult::NoHandlers);
        };

        let report = self.engine.dispatch(ctx, &event, &handlers).await;
        let (message, failures) = report.into_parts();

        if message.is_empty() {
            tracing::debug!(failures = failures.len(), "Not creating note, message empty");
            return Ok(RelayMergeRequestResult::NothingToPublish { failures });
        }

        // The dispatch deadline may already have passed; publishing gets its
        // own deadline and stops only on cancellation.
        let publish_ctx = ctx.renewed(self.publish_timeout);
        let body = message.into_string();
        if let Err(e) = self
            .publisher
            .publish(&publish_ctx, event.target(), &body)
            .await
        {
            tracing::error!(error = %e, "Error adding merge request note");
            return Err(e);
        }

        tracing::info!(
            fragments_failed = failures.len(),
            bytes = body.len(),
            "Published merge request note"
        );
        Ok(RelayMergeRequestResult::Published { body, failures })
    }
}
