//! Handler registry - which handlers run for which merge request action.
//!
//! Each action maps to an immutable snapshot of its handler sequence.
//! Registration builds a new snapshot and swaps it in under the write lock,
//! so a lookup never observes a half-appended sequence and never holds the
//! lock while handlers run.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::merge_request::MergeRequestAction;
use crate::ports::MergeRequestHandler;

/// Ordered, immutable handler sequence for one action.
pub type HandlerList = Arc<[Arc<dyn MergeRequestHandler>]>;

/// Maps merge request actions to ordered handler sequences.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<MergeRequestAction, HandlerList>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the sequence for `action`.
    pub fn register(
        &self,
        action: impl Into<MergeRequestAction>,
        handler: Arc<dyn MergeRequestHandler>,
    ) {
        let action = action.into();
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(action = %action, handler = handler.name(), "Registering handler");
        let updated: HandlerList = match handlers.get(&action) {
            Some(existing) => existing
                .iter()
                .cloned()
                .chain(std::iter::once(handler))
                .collect(),
            None => Arc::from(vec![handler]),
        };
        handlers.insert(action, updated);
    }

    /// Appends the same handler instance to every action in `actions`.
    pub fn register_all<A>(&self, actions: &[A], handler: Arc<dyn MergeRequestHandler>)
    where
        A: Clone + Into<MergeRequestAction>,
    {
        for action in actions {
            self.register(action.clone(), Arc::clone(&handler));
        }
    }

    /// Returns the handler snapshot for `action`, or `None` when nothing is
    /// registered for it.
    pub fn lookup(&self, action: &MergeRequestAction) -> Option<HandlerList> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(action)
            .cloned()
    }

    /// Number of handlers registered for `action`.
    pub fn handler_count(&self, action: &MergeRequestAction) -> usize {
        self.lookup(action).map_or(0, |list| list.len())
    }

    /// Actions that have at least one handler.
    pub fn actions(&self) -> Vec<MergeRequestAction> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
