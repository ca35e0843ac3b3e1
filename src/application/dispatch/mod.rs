//! Dispatch - registry of handlers per action and the engine that runs them.

mod engine;
mod registry;

pub use engine::{DispatchEngine, DispatchReport, HandlerFailure};
pub use registry::{HandlerList, HandlerRegistry};
