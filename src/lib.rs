//! Merge Relay - GitLab merge request webhook relay
//!
//! Runs every handler registered for a merge request action in parallel under
//! one deadline, joins their output in registration order, and posts it back
//! to the merge request as a single note.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
