//! Error types for the reconciliation engine.
//!
//! Only setup can fail. Once a [`crate::TypeMap`] exists, reconciliation
//! always returns a result; bad input records become
//! [`crate::Diagnostic`]s instead of errors.

use thiserror::Error;

/// Errors produced while preparing a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The type table is not a JSON object of strings.
    #[error("unable to parse type map: {0}")]
    TypeMapParse(#[from] serde_json::Error),

    /// The type table parsed but is not a usable bidirectional mapping.
    #[error("invalid type map: {0}")]
    TypeMap(String),

    /// The type table file could not be read.
    #[error("unable to read type map {path}: {source}")]
    TypeMapIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for reconciliation setup.
pub type Result<T> = std::result::Result<T, ReconcileError>;
