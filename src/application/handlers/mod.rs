//! Application command handlers.

mod relay_merge_request;

pub use relay_merge_request::{
    RelayMergeRequestCommand, RelayMergeRequestHandler, RelayMergeRequestResult,
    DEFAULT_PUBLISH_TIMEOUT,
};
