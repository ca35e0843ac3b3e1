//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay core and the outside world. Adapters implement these ports.
//!
//! ## Dispatch Ports
//!
//! - `MergeRequestHandler` - Unit of behavior contributing text to a note
//! - `NotePublisher` - Posts the aggregated note on the merge request
//!
//! ## Backend Ports
//!
//! - `IssueTracker` - Read access to issues referenced by a merge request
//! - `SessionBackend` - Login-then-request API driven through a `SessionGate`

mod issue_tracker;
mod merge_request_handler;
mod note_publisher;
mod session_backend;

pub use issue_tracker::{IssueTracker, IssueTrackerError, TrackedIssue};
pub use merge_request_handler::{HandlerError, MergeRequestHandler};
pub use note_publisher::{NotePublisher, PublishError};
pub use session_backend::SessionBackend;
