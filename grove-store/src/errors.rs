use std::time::Duration;

use thiserror::Error;

use crate::model::NodeId;

/// Errors raised while importing or validating a forest snapshot.
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node id `{0}` appears more than once")]
    DuplicateId(NodeId),
}

/// Errors reported by a children fetcher.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("children unavailable: {message}")]
    Unavailable { message: String },
    #[error("fetch timed out after {after:?}")]
    TimedOut { after: Duration },
    #[error("no async runtime available to run the fetch")]
    NoRuntime,
}
