//! Error type for response serialization.

use thiserror::Error;

/// Errors raised while producing the wire payload.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The command stream could not be serialized to JSON.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}
