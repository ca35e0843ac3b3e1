//! Merge request handlers.
//!
//! - `StaticMessageHandler` - Fixed text
//! - `UrlFileHandler` - Contents of a remote file
//! - `YouTrackIssueHandler` - Summary of the issue named by the source branch

mod issue_id;
mod message;
mod url_file;
mod youtrack;

pub use issue_id::{IssueIdPattern, IssueIdPatternError, DEFAULT_BRANCH_PATTERN};
pub use message::StaticMessageHandler;
pub use url_file::UrlFileHandler;
pub use youtrack::YouTrackIssueHandler;
