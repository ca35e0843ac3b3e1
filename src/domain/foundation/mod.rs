//! Foundation module - Shared primitives.
//!
//! Contains the cancellation context threaded through every dispatch.

mod context;

pub use context::{DispatchContext, Interruption};
