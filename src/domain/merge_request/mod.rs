//! Merge request module - events relayed from GitLab and the note built for them.

mod event;
mod message;

pub use event::{MergeRequestAction, MergeRequestEvent, MergeRequestId};
pub use message::AggregatedMessage;
