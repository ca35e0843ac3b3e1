//! GitLab adapters.
//!
//! - `GitLabClient` - Publishes notes through the GitLab v4 REST API
//! - `InMemoryNotePublisher` - Records notes in memory for tests
//! - `MergeRequestWebhook` - Decoded merge request webhook payload

mod client;
mod in_memory;
mod model;

pub use client::{GitLabClient, GitLabError};
pub use in_memory::{InMemoryNotePublisher, PublishedNote};
pub use model::{MergeRequestAttributes, MergeRequestWebhook, Note};
