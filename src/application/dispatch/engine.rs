//! DispatchEngine - Fan a merge request event out to handlers and fan the results back in.
//!
//! Every handler runs on its own task. Results are then read in registration
//! order, each read raced against the dispatch context, so that:
//!
//! - the note layout depends only on registration order, never on latency
//! - a hung handler costs at most the remaining deadline, after which it is
//!   reported as `DeadlineExceeded` and reading moves on to the next handler
//! - one handler failing never prevents the others from contributing
//!
//! Tasks that have not delivered by the time the dispatch ends are aborted.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::{AggregatedMessage, MergeRequestEvent};
use crate::ports::{HandlerError, MergeRequestHandler};

/// A handler that did not contribute because it failed.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Position of the handler in the registration order.
    pub position: usize,
    /// Handler name, for logging.
    pub handler: &'static str,
    pub error: HandlerError,
}

/// Outcome of one dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    message: AggregatedMessage,
    failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// The aggregated note body (possibly empty).
    pub fn message(&self) -> &AggregatedMessage {
        &self.message
    }

    /// Handlers that failed, in registration order.
    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    /// True when no handler produced text, so no note must be published.
    pub fn is_nothing_to_publish(&self) -> bool {
        self.message.is_empty()
    }

    pub fn into_parts(self) -> (AggregatedMessage, Vec<HandlerFailure>) {
        (self.message, self.failures)
    }
}

/// One spawned handler invocation. Aborts the task when dropped.
struct Unit {
    handler: &'static str,
    task: JoinHandle<Result<String, HandlerError>>,
}

impl Drop for Unit {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Runs handler sequences for merge request events.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchEngine;

impl DispatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs every handler in `handlers` concurrently and aggregates their
    /// fragments in the order given.
    ///
    /// The whole call is bounded by `ctx`; it never fails as a whole, failures
    /// are reported per handler in the returned report.
    #[instrument(
        name = "dispatch",
        skip_all,
        fields(action = %event.action(), merge_request = %event.target(), handlers = handlers.len())
    )]
    pub async fn dispatch(
        &self,
        ctx: &DispatchContext,
        event: &MergeRequestEvent,
        handlers: &[Arc<dyn MergeRequestHandler>],
    ) -> DispatchReport {
        if handlers.is_empty() {
            return DispatchReport::default();
        }

        let event = Arc::new(event.clone());
        let units: Vec<Unit> = handlers
            .iter()
            .map(|handler| {
                let handler = Arc::clone(handler);
                let ctx = ctx.clone();
                let event = Arc::clone(&event);
                Unit {
                    handler: handler.name(),
                    task: tokio::spawn(async move { handler.handle(&ctx, &event).await }),
                }
            })
            .collect();

        let mut report = DispatchReport::default();
        for (position, mut unit) in units.into_iter().enumerate() {
            let result = tokio::select! {
                biased;
                joined = &mut unit.task => joined
                    .unwrap_or_else(|e| Err(HandlerError::Aborted(e.to_string()))),
                reason = ctx.done() => Err(HandlerError::from(reason)),
            };

            match result {
                Ok(fragment) => {
                    if !report.message.push_fragment(&fragment) {
                        tracing::debug!(handler = unit.handler, position, "Handler produced no text");
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        handler = unit.handler,
                        position,
                        error = %error,
                        "Handler failed"
                    );
                    report.failures.push(HandlerFailure {
                        position,
                        handler: unit.handler,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            fragments = report.message.fragment_count(),
            failures = report.failures.len(),
            "Dispatch complete"
        );
        report
    }
}
