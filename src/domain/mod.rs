//! Domain layer containing the types relayed between GitLab and handlers.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (cancellation context)
//! - `merge_request` - Merge request events, target identity, aggregated notes
//! - `markdown` - Quoting and GitLab reference escaping for note text

pub mod foundation;
pub mod markdown;
pub mod merge_request;
