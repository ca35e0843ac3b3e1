//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the relay to external systems:
//! - `gitlab` - Note publishing and webhook payloads
//! - `handlers` - Merge request handlers
//! - `http` - Inbound webhook endpoint
//! - `session` - Serialized login+request cycles
//! - `youtrack` - Issue tracker backed by YouTrack

pub mod gitlab;
pub mod handlers;
pub mod http;
pub mod session;
pub mod youtrack;

pub use gitlab::{GitLabClient, InMemoryNotePublisher};
pub use session::{SessionError, SessionGate};
pub use youtrack::YouTrackClient;
