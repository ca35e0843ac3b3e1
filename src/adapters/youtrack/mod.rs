//! YouTrack adapter.
//!
//! - `YouTrackClient` - `IssueTracker` backed by YouTrack's REST API
//! - `YouTrackSession` - Cookie login+request backend driven by a `SessionGate`

mod client;
mod error;
mod model;

pub use client::{YouTrackClient, YouTrackSession};
pub use error::YouTrackError;
pub use model::{Issue, IssueField};
