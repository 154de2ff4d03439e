//! Resolver and ledger traits: the two capabilities the handler is built from.
//!
//! Both are async so the filesystem and SQLite backends can push blocking
//! work off the runtime.

use async_trait::async_trait;
use hashdata_core::{ObjectContent, ObjectKey, Sha256Hash};

use crate::error::Result;

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Surrogate key, assigned in insertion order.
    pub id: i64,
    pub key: ObjectKey,
    /// Digest computed by the ledger at write time.
    pub hash: Sha256Hash,
    pub content: ObjectContent,
    /// When the row was written (Unix ms).
    pub recorded_at: i64,
}

/// Loads the authoritative content for a key.
///
/// Implementations must be side-effect free. A missing object is
/// [`StoreError::NotFound`](crate::StoreError::NotFound); every other read
/// failure is [`StoreError::Io`](crate::StoreError::Io) or
/// [`StoreError::InvalidContent`](crate::StoreError::InvalidContent).
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn resolve(&self, key: &ObjectKey) -> Result<ObjectContent>;
}

/// Durable, write-once record of resolved objects.
///
/// # Design Notes
///
/// - **Write-once**: `(type, version)` is unique for the lifetime of the
///   ledger. A second `record` for the same key returns
///   [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists) and
///   changes nothing.
/// - **Concurrency**: concurrent `record` calls for one key are settled by
///   the backend's uniqueness check. Exactly one succeeds.
/// - **Atomicity**: a row is either fully written or absent.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Hash `content`, then insert `(key, hash, content)`.
    ///
    /// Returns the computed hash.
    async fn record(&self, key: &ObjectKey, content: &ObjectContent) -> Result<Sha256Hash>;

    /// Get the row recorded for `key`, if any.
    async fn get(&self, key: &ObjectKey) -> Result<Option<LedgerRecord>>;

    /// Number of rows recorded for `key`. Never more than one.
    async fn count(&self, key: &ObjectKey) -> Result<u64>;

    /// Total number of rows.
    async fn len(&self) -> Result<u64>;
}
