//! Domain-level errors (no I/O concerns)

use thiserror::Error;

/// Errors reported by the node graph itself.
///
/// Most invalid input (bad indices, missing tags, unmet insertion
/// preconditions) is reported through `None`/`false` instead; only payload
/// rejection and document decoding produce an error.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("data type of {0} not allowed: link nodes as children instead")]
    NodeAsData(&'static str),

    #[error("invalid node document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
