//! Error types for the store module.

use hashdata_core::{CoreError, ErrorKind, ObjectKey};
use thiserror::Error;

/// Errors that can occur while resolving or recording objects.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No object exists for the key.
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// The content store could not be read.
    #[error("failed to read {key}: {source}")]
    Io {
        key: ObjectKey,
        #[source]
        source: std::io::Error,
    },

    /// The content store returned bytes that cannot be recorded.
    #[error("corrupt content for {key}: {source}")]
    InvalidContent {
        key: ObjectKey,
        #[source]
        source: CoreError,
    },

    /// The key does not name a safe location.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] CoreError),

    /// The key was recorded by an earlier call.
    #[error("{0} already exists")]
    AlreadyExists(ObjectKey),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Lock poisoning or a failed blocking task.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Io { .. } | StoreError::InvalidContent { .. } => ErrorKind::IoFailure,
            StoreError::InvalidKey(_) => ErrorKind::MalformedInput,
            StoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StoreError::Database(_) | StoreError::Migration(_) | StoreError::Internal(_) => {
                ErrorKind::InternalError
            }
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
