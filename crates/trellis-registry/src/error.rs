//! Environment errors raised during registration and materialization.
//!
//! "Not registered" is never an error in this crate; lookups signal it with
//! `None`. The variants here cover registration-time filesystem failures,
//! which are fatal at startup and never recoverable per-request.

use std::path::PathBuf;

use thiserror::Error;

/// Registration-time environment failures.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A registered directory could not be traversed.
    #[error("failed to scan directory '{path}': {source}")]
    DirectoryScan {
        /// Directory that was being scanned.
        path: PathBuf,
        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// The include file recorded for a callable does not exist.
    #[error("include file '{path}' for callable '{identity}' not found")]
    IncludeMissing {
        /// Identity the include file belongs to.
        identity: String,
        /// Path that was checked.
        path: PathBuf,
    },
}

impl RegistryError {
    /// Creates a directory scan error.
    #[must_use]
    pub fn directory_scan(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryScan {
            path: path.into(),
            source,
        }
    }

    /// Creates a missing include file error.
    #[must_use]
    pub fn include_missing(identity: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::IncludeMissing {
            identity: identity.into(),
            path: path.into(),
        }
    }
}
