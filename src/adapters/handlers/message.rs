//! Handler that always contributes the same text.

use async_trait::async_trait;

use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestEvent;
use crate::ports::{HandlerError, MergeRequestHandler};

/// Contributes a fixed message to every note.
#[derive(Debug, Clone)]
pub struct StaticMessageHandler {
    message: String,
}

impl StaticMessageHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl MergeRequestHandler for StaticMessageHandler {
    async fn handle(
        &self,
        _ctx: &DispatchContext,
        _event: &MergeRequestEvent,
    ) -> Result<String, HandlerError> {
        Ok(self.message.clone())
    }

    fn name(&self) -> &'static str {
        "StaticMessageHandler"
    }
}
