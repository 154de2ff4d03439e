//! Error types for the request handler.

use hashdata_core::{CoreError, ErrorKind, ObjectKey};
use hashdata_store::StoreError;
use thiserror::Error;

/// Status codes reported with each error, numbered as gRPC numbers them.
pub mod code {
    pub const INVALID_ARGUMENT: u32 = 3;
    pub const NOT_FOUND: u32 = 5;
    pub const ALREADY_EXISTS: u32 = 6;
    pub const UNIMPLEMENTED: u32 = 12;
    pub const INTERNAL: u32 = 13;
}

/// Errors returned by [`Handler::handle`](crate::Handler::handle) and
/// [`Module::dispatch`](crate::Module::dispatch).
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request payload is not a valid envelope.
    #[error("cannot unmarshal type")]
    Unmarshal(#[source] serde_json::Error),

    /// The response could not be encoded.
    #[error("cannot marshal type")]
    Marshal(#[source] serde_json::Error),

    /// The key does not name a safe location.
    #[error("invalid key: {0}")]
    InvalidKey(#[source] CoreError),

    /// No object exists for the key.
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// The content store failed or returned unusable content.
    #[error("cannot read content: {0}")]
    Io(#[source] StoreError),

    /// The key was recorded by an earlier call.
    #[error("{0} already exists")]
    AlreadyExists(ObjectKey),

    /// Ledger or runtime failure.
    #[error("internal server error: {0}")]
    Internal(#[source] StoreError),

    /// No RPC is registered under this id.
    #[error("unknown rpc: {0}")]
    UnknownRpc(String),
}

impl HandlerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Unmarshal(_) | HandlerError::Marshal(_) | HandlerError::InvalidKey(_) => {
                ErrorKind::MalformedInput
            }
            HandlerError::NotFound(_) => ErrorKind::NotFound,
            HandlerError::Io(_) => ErrorKind::IoFailure,
            HandlerError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            HandlerError::Internal(_) | HandlerError::UnknownRpc(_) => ErrorKind::InternalError,
        }
    }

    /// Numeric status for the caller. See [`code`].
    pub fn code(&self) -> u32 {
        match self {
            // Decode and encode failures are reported as INTERNAL, not
            // INVALID_ARGUMENT.
            HandlerError::Unmarshal(_) | HandlerError::Marshal(_) => code::INTERNAL,
            HandlerError::InvalidKey(_) => code::INVALID_ARGUMENT,
            HandlerError::NotFound(_) => code::NOT_FOUND,
            HandlerError::AlreadyExists(_) => code::ALREADY_EXISTS,
            HandlerError::UnknownRpc(_) => code::UNIMPLEMENTED,
            HandlerError::Io(_) | HandlerError::Internal(_) => code::INTERNAL,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => HandlerError::NotFound(key),
            StoreError::AlreadyExists(key) => HandlerError::AlreadyExists(key),
            StoreError::InvalidKey(e) => HandlerError::InvalidKey(e),
            e @ (StoreError::Io { .. } | StoreError::InvalidContent { .. }) => HandlerError::Io(e),
            e => HandlerError::Internal(e),
        }
    }
}

/// Result type for handler operations.
pub type Result<T> = std::result::Result<T, HandlerError>;
