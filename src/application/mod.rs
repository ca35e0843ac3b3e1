//! Application layer - Dispatch machinery and command handlers.
//!
//! This layer orchestrates the flow from a decoded merge request event to a
//! published note, coordinating between ports.

pub mod dispatch;
pub mod handlers;

pub use dispatch::{DispatchEngine, DispatchReport, HandlerFailure, HandlerList, HandlerRegistry};
pub use handlers::{RelayMergeRequestCommand, RelayMergeRequestHandler, RelayMergeRequestResult};
