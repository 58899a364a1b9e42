//! Error types for request dispatch failures.
//!
//! Validation and resolution failures are not represented here: they recover
//! locally into a `Rejected` outcome plus an invalid-hook notification, and
//! the caller still receives the shared response. The variants below are the
//! failures that surface to the caller.

use thiserror::Error;

use trellis_registry::{InvocationError, RegistryError};

/// Errors surfaced during request parsing and dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request payload could not be parsed as valid JSON.
    #[error("malformed request: {message}")]
    MalformedRequest {
        /// Human-readable parse failure description.
        message: String,
        /// Optional underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request JSON structure does not match the expected schema.
    #[error("invalid request structure: {message}")]
    InvalidStructure {
        /// Description of the structural violation.
        message: String,
    },

    /// Registration-time environment failure hit during lazy materialization.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The target method raised and no error hook is registered.
    #[error("invocation failed: {0}")]
    Invocation(#[from] InvocationError),
}

impl DispatchError {
    /// Creates a malformed request error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedRequest {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid structure error.
    #[must_use]
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
