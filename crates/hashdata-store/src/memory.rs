//! In-memory implementations of the resolver and ledger traits.
//!
//! These are primarily for testing. They have the same semantics as the
//! filesystem and SQLite backends but keep everything in memory with no
//! persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use hashdata_core::{validate_key, ObjectContent, ObjectKey, Sha256Hash};

use crate::error::{Result, StoreError};
use crate::migration::now_millis;
use crate::traits::{ContentResolver, Ledger, LedgerRecord};

fn poisoned<T>(e: PoisonError<T>) -> StoreError {
    StoreError::Internal(format!("lock poisoned: {}", e))
}

/// In-memory content store.
///
/// Holds raw bytes so tests can plant content that fails UTF-8 decoding.
#[derive(Default)]
pub struct MemoryResolver {
    objects: RwLock<HashMap<ObjectKey, Vec<u8>>>,
}

impl MemoryResolver {
    /// Create a new empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the content for `key`.
    pub fn insert(&self, key: ObjectKey, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.objects
            .write()
            .map_err(poisoned)?
            .insert(key, bytes.into());
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert) for test setup.
    pub fn with_object(self, key: ObjectKey, bytes: impl Into<Vec<u8>>) -> Self {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, bytes.into());
        self
    }
}

#[async_trait]
impl ContentResolver for MemoryResolver {
    async fn resolve(&self, key: &ObjectKey) -> Result<ObjectContent> {
        validate_key(key)?;

        let bytes = self
            .objects
            .read()
            .map_err(poisoned)?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        ObjectContent::from_bytes(bytes).map_err(|source| StoreError::InvalidContent {
            key: key.clone(),
            source,
        })
    }
}

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped. Thread-safe via RwLock; the
/// write lock plays the part of the database uniqueness check.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

struct MemoryLedgerInner {
    records: BTreeMap<ObjectKey, LedgerRecord>,
    next_id: i64,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Every record, in key order.
    pub fn records(&self) -> Result<Vec<LedgerRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.values().cloned().collect())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn record(&self, key: &ObjectKey, content: &ObjectContent) -> Result<Sha256Hash> {
        let hash = content.digest();
        let mut inner = self.inner.write().map_err(poisoned)?;

        if inner.records.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.clone()));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.records.insert(
            key.clone(),
            LedgerRecord {
                id,
                key: key.clone(),
                hash,
                content: content.clone(),
                recorded_at: now_millis(),
            },
        );

        Ok(hash)
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<LedgerRecord>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.get(key).cloned())
    }

    async fn count(&self, key: &ObjectKey) -> Result<u64> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(u64::from(inner.records.contains_key(key)))
    }

    async fn len(&self) -> Result<u64> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.records.len() as u64)
    }
}
