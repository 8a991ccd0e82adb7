//! Error types for shiftcal.

use thiserror::Error;

use crate::export::ExportScope;

/// Errors that can occur in shiftcal operations.
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A shift type with the label \"{0}\" already exists.")]
    DuplicateLabel(String),

    #[error("Shift type not found: {0}")]
    NotFound(String),

    #[error("Malformed data stored under '{key}': {reason}")]
    MalformedPersistedData { key: String, reason: String },

    #[error("Malformed drag payload: {0}")]
    MalformedDragPayload(String),

    #[error("{}", .0.empty_message())]
    EmptyExport(ExportScope),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for shiftcal operations.
pub type ShiftResult<T> = Result<T, ShiftError>;
