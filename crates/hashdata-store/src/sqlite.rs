//! SQLite implementation of the Ledger trait.
//!
//! This is the primary ledger backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use hashdata_core::{ObjectContent, ObjectKey, Sha256Hash};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{Ledger, LedgerRecord};

/// Whether `err` is SQLite rejecting a row for a duplicate `UNIQUE` or
/// `PRIMARY KEY` value.
///
/// Other constraint failures (`NOT NULL`, `CHECK`) are not uniqueness
/// violations.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

/// SQLite-backed ledger.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteLedger {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    /// Set once the schema has been ensured successfully.
    schema_ready: Arc<AtomicBool>,
}

impl SqliteLedger {
    /// Open a SQLite database at the given path.
    ///
    /// The schema is not touched until the first operation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            schema_ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the schema has been ensured on this connection.
    pub fn schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Acquire)
    }

    /// Ensure the schema now, surfacing any failure.
    ///
    /// Operations ensure the schema on their own; this is for callers that
    /// want a failing database to stop startup.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.blocking(|conn, ready| {
            if !ready.load(Ordering::Acquire) {
                migration::migrate(conn)?;
                ready.store(true, Ordering::Release);
            }
            Ok(())
        })
        .await
    }

    /// Run `f` on the blocking pool with the connection locked.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection, &AtomicBool) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        let ready = self.schema_ready.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Internal(format!("mutex poisoned: {}", e)))?;
            f(&mut conn, &ready)
        })
        .await
        .map_err(|e| StoreError::Internal(format!("spawn_blocking failed: {}", e)))?
    }
}

/// Create the schema if this connection has not done so yet.
///
/// Failure is logged, not returned: the statement that follows reports the
/// real problem if the table is actually missing. The flag stays unset so the
/// next call tries again.
fn ensure_schema_lenient(conn: &mut Connection, ready: &AtomicBool) {
    if ready.load(Ordering::Acquire) {
        return;
    }

    match migration::migrate(conn) {
        Ok(()) => {
            ready.store(true, Ordering::Release);
            tracing::debug!("ledger schema ready");
        }
        Err(e) => tracing::error!(error = %e, "failed to create ledger table"),
    }
}

// Helper to convert a row to LedgerRecord
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerRecord> {
    let hash_hex: String = row.get("hash")?;
    let hash = Sha256Hash::from_hex(&hash_hex).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let content: String = row.get("content")?;

    Ok(LedgerRecord {
        id: row.get("id")?,
        key: ObjectKey::new(row.get::<_, String>("type")?, row.get::<_, String>("version")?),
        hash,
        content: ObjectContent::from(content),
        recorded_at: row.get("recorded_at")?,
    })
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn record(&self, key: &ObjectKey, content: &ObjectContent) -> Result<Sha256Hash> {
        let key = key.clone();
        let content = content.clone();

        self.blocking(move |conn, ready| {
            let hash = content.digest();
            ensure_schema_lenient(conn, ready);

            let inserted = conn.execute(
                "INSERT INTO hash_data (type, version, hash, content, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    key.object_type,
                    key.version,
                    hash.to_hex(),
                    content.as_str(),
                    now_millis(),
                ],
            );

            match inserted {
                Ok(_) => Ok(hash),
                Err(e) if is_unique_violation(&e) => Err(StoreError::AlreadyExists(key)),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<LedgerRecord>> {
        let key = key.clone();

        self.blocking(move |conn, ready| {
            ensure_schema_lenient(conn, ready);

            conn.query_row(
                "SELECT id, type, version, hash, content, recorded_at
                 FROM hash_data WHERE type = ?1 AND version = ?2",
                params![key.object_type, key.version],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn count(&self, key: &ObjectKey) -> Result<u64> {
        let key = key.clone();

        self.blocking(move |conn, ready| {
            ensure_schema_lenient(conn, ready);

            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM hash_data WHERE type = ?1 AND version = ?2",
                params![key.object_type, key.version],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
    }

    async fn len(&self) -> Result<u64> {
        self.blocking(|conn, ready| {
            ensure_schema_lenient(conn, ready);

            let count: i64 = conn.query_row("SELECT COUNT(*) FROM hash_data", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild() -> (ObjectKey, ObjectContent) {
        (ObjectKey::new("guild", "2.0.0"), ObjectContent::from("{\"x\":1}"))
    }

    #[tokio::test]
    async fn test_record_and_get() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let (key, content) = guild();

        let hash = ledger.record(&key, &content).await.unwrap();
        assert_eq!(hash, Sha256Hash::hash(b"{\"x\":1}"));

        let row = ledger.get(&key).await.unwrap().unwrap();
        assert_eq!(row.key, key);
        assert_eq!(row.hash, hash);
        assert_eq!(row.content, content);
        assert!(row.id > 0);
    }

    #[tokio::test]
    async fn test_duplicate_is_already_exists() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let (key, content) = guild();

        ledger.record(&key, &content).await.unwrap();

        // Different content under the same key is still a duplicate.
        let err = ledger
            .record(&key, &ObjectContent::from("{\"x\":2}"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref k) if *k == key));

        assert_eq!(ledger.count(&key).await.unwrap(), 1);
        let row = ledger.get(&key).await.unwrap().unwrap();
        assert_eq!(row.content, content);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_rows() {
        let ledger = SqliteLedger::open_memory().unwrap();
        let content = ObjectContent::from("{}");

        let a = ledger.get(&ObjectKey::new("core", "1.0.0")).await.unwrap();
        assert!(a.is_none());

        ledger.record(&ObjectKey::new("core", "1.0.0"), &content).await.unwrap();
        ledger.record(&ObjectKey::new("core", "1.0.1"), &content).await.unwrap();
        ledger.record(&ObjectKey::new("guild", "1.0.0"), &content).await.unwrap();

        assert_eq!(ledger.len().await.unwrap(), 3);
        let first = ledger.get(&ObjectKey::new("core", "1.0.0")).await.unwrap().unwrap();
        let last = ledger.get(&ObjectKey::new("guild", "1.0.0")).await.unwrap().unwrap();
        assert!(first.id < last.id);
    }

    #[tokio::test]
    async fn test_schema_ensured_lazily_once() {
        let ledger = SqliteLedger::open_memory().unwrap();
        assert!(!ledger.schema_ready());

        let (key, content) = guild();
        ledger.record(&key, &content).await.unwrap();
        assert!(ledger.schema_ready());

        ledger.ensure_schema().await.unwrap();
        assert_eq!(ledger.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_schema_failure_is_not_fatal_or_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE schema_migrations (x INTEGER);
                 CREATE TABLE hash_data (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     type TEXT NOT NULL,
                     version TEXT NOT NULL,
                     hash TEXT NOT NULL,
                     content TEXT NOT NULL,
                     recorded_at INTEGER NOT NULL,
                     UNIQUE(type, version)
                 );",
            )
            .unwrap();
        }

        let ledger = SqliteLedger::open(&path).unwrap();
        let content = ObjectContent::from("{}");

        let hash = ledger.record(&ObjectKey::new("a", "1"), &content).await.unwrap();
        assert_eq!(hash, Sha256Hash::hash(b"{}"));
        assert!(!ledger.schema_ready());

        ledger.record(&ObjectKey::new("b", "1"), &content).await.unwrap();
        assert!(!ledger.schema_ready());
        assert_eq!(ledger.len().await.unwrap(), 2);

        let err = ledger.record(&ObjectKey::new("a", "1"), &content).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        assert!(ledger.ensure_schema().await.is_err());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let (key, content) = guild();

        {
            let ledger = SqliteLedger::open(&path).unwrap();
            ledger.record(&key, &content).await.unwrap();
        }

        let ledger = SqliteLedger::open(&path).unwrap();
        let err = ledger.record(&key, &content).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(ledger.count(&key).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_record_one_winner() {
        let ledger = Arc::new(SqliteLedger::open_memory().unwrap());
        let (key, content) = guild();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = ledger.clone();
            let key = key.clone();
            let content = content.clone();
            handles.push(tokio::spawn(async move { ledger.record(&key, &content).await }));
        }

        let mut won = 0;
        let mut lost = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(StoreError::AlreadyExists(_)) => lost += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(won, 1);
        assert_eq!(lost, 15);
        assert_eq!(ledger.count(&key).await.unwrap(), 1);
    }

    #[test]
    fn test_is_unique_violation() {
        let mut conn = Connection::open_in_memory().unwrap();
        migration::migrate(&mut conn).unwrap();

        let insert = "INSERT INTO hash_data (type, version, hash, content, recorded_at)
                      VALUES ('core', '1.0.0', 'h', 'c', 0)";
        conn.execute(insert, []).unwrap();
        let dup = conn.execute(insert, []).unwrap_err();
        assert!(is_unique_violation(&dup));

        let not_null = conn
            .execute(
                "INSERT INTO hash_data (type, version, hash, content, recorded_at)
                 VALUES ('core', '9.9.9', NULL, 'c', 0)",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&not_null));

        let syntax = conn.execute("INSERT INTO nowhere VALUES (1)", []).unwrap_err();
        assert!(!is_unique_violation(&syntax));
    }
}
