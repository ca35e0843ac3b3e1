//! Session gate adapter.
//!
//! Wraps any `SessionBackend` so that at most one login+request cycle runs at
//! a time while waiters stay cancellable.

mod gate;

pub use gate::{SessionError, SessionGate};
