//! Error types for hashdata core.

use thiserror::Error;

/// Errors raised while interpreting keys and content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid {field}: {reason}")]
    InvalidKey {
        field: &'static str,
        reason: &'static str,
    },

    #[error("content is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

/// Caller-facing classification of every failure `read_data` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request or response could not be (de)serialized, or the key is unsafe.
    MalformedInput,
    /// No object at the addressed location.
    NotFound,
    /// The content store could not be read, or returned unusable bytes.
    IoFailure,
    /// The key was recorded by an earlier call.
    AlreadyExists,
    /// Anything else: database failures, task failures.
    InternalError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::IoFailure => "io_failure",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InternalError => "internal_error",
        };
        f.write_str(s)
    }
}
