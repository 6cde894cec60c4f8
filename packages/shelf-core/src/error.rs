//! Facade and store error types.

use std::io::ErrorKind;

use thiserror::Error;

/// Errors raised by store adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// I/O error while reading or writing the backing file
    #[error("I/O error: {0}")]
    Io(String),

    /// Backing storage is full
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored data failed an integrity check
    #[error("Data corruption detected: {0}")]
    Corrupted(String),

    /// Workbook has no sheet at the requested index
    #[error("Sheet index {index} out of range (workbook has {count} sheets)")]
    SheetNotFound { index: usize, count: usize },

    /// Record position no longer exists in the sheet
    #[error("Row {row_index} does not exist (sheet has {row_count} data rows)")]
    RowOutOfRange { row_index: usize, row_count: usize },

    /// Row moved since it was enumerated
    #[error("Row {row_index} no longer holds key '{key}'")]
    StaleRow { row_index: usize, key: String },

    /// Unique index violation
    #[error("Duplicate key '{key}' for unique field '{field}'")]
    DuplicateKey { field: &'static str, key: String },
}

impl StoreError {
    /// Classifies an I/O error with the operation that produced it.
    pub fn from_io(error: std::io::Error, context: &str) -> Self {
        match error.kind() {
            ErrorKind::StorageFull | ErrorKind::OutOfMemory => {
                StoreError::DiskFull(format!("{}: {}", context, error))
            }
            _ => StoreError::Io(format!("{}: {}", context, error)),
        }
    }
}

/// Facade operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShelfError {
    /// One or more required fields are missing
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Payload has the wrong shape
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No record carries the requested business key
    #[error("{entity} with {key_field} '{key}' not found")]
    NotFound {
        entity: &'static str,
        key_field: &'static str,
        key: String,
    },

    /// Business key already taken
    #[error("Duplicate key: an asset with gmrVmrNo '{key}' already exists")]
    DuplicateKey { key: String },

    /// Store could not be initialized; captured once and re-signaled
    #[error("{store} store is unavailable: {message}")]
    StoreInit { store: &'static str, message: String },

    /// Store failed mid-request
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Blocking task failed before producing a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    /// Returns true for errors caused by the request rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShelfError::MissingFields { .. }
                | ShelfError::Validation(_)
                | ShelfError::NotFound { .. }
                | ShelfError::DuplicateKey { .. }
        )
    }
}
