//! Error types for the DataStates adapter
//!
//! Provides a unified error type for all operations. Row invariant violations
//! are ordinary variants, reported the same way in debug and release builds.

use thiserror::Error;

/// Result type alias using DbError
pub type Result<T> = std::result::Result<T, DbError>;

/// Unified error type for adapter operations
#[derive(Debug, Error)]
pub enum DbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not supported: {0}")]
    Unsupported(&'static str),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    // -------------------------------------------------------------------------
    // Row Codec Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt row at byte {offset}: {reason}")]
    CorruptRow { offset: usize, reason: String },

    #[error("Field {component} of {len} bytes exceeds the 32-bit length prefix")]
    FieldTooLarge { component: &'static str, len: usize },

    #[error("Row has {actual} fields, expected {expected}")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("Requested fields not found in row: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Update references unknown field: {0}")]
    UnknownField(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Store insert failed for key {0}")]
    StoreWrite(String),

    #[error("Store remove failed for key {0}")]
    StoreRemove(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),
}

/// Render a byte-string for error messages and logs
pub(crate) fn display_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
