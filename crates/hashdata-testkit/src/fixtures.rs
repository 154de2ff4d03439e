//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::PathBuf;

use hashdata::{Handler, ServiceConfig};
use hashdata_core::ObjectKey;
use hashdata_store::{FsResolver, MemoryLedger, MemoryResolver, SqliteLedger};
use tempfile::TempDir;

/// A temporary content tree plus a ledger path next to it.
///
/// Everything is removed when the fixture is dropped.
pub struct ContentTree {
    dir: TempDir,
}

impl ContentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("create data root");
        Self { dir }
    }

    /// Root that objects are written under.
    pub fn data_root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Ledger database location.
    pub fn database(&self) -> PathBuf {
        self.dir.path().join("ledger.db")
    }

    /// Write `<type>/<version>.json`.
    pub fn write(&self, object_type: &str, version: &str, body: impl AsRef<[u8]>) -> PathBuf {
        let dir = self.data_root().join(object_type);
        std::fs::create_dir_all(&dir).expect("create type dir");
        let path = dir.join(format!("{version}.json"));
        std::fs::write(&path, body).expect("write object");
        path
    }

    /// Builder-style [`write`](Self::write).
    pub fn with_object(self, object_type: &str, version: &str, body: impl AsRef<[u8]>) -> Self {
        self.write(object_type, version, body);
        self
    }

    /// A config pointing at this tree.
    pub fn config(&self) -> ServiceConfig {
        ServiceConfig {
            data_root: self.data_root(),
            database: self.database(),
            ..ServiceConfig::default()
        }
    }

    /// Filesystem resolver plus SQLite ledger, as in production.
    pub fn sqlite_handler(&self) -> Handler<FsResolver, SqliteLedger> {
        self.config().open_handler().expect("open sqlite handler")
    }
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

/// An all-in-memory handler preloaded with `objects`.
pub fn memory_handler<'a>(
    objects: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
) -> Handler<MemoryResolver, MemoryLedger> {
    let resolver = objects
        .into_iter()
        .fold(MemoryResolver::new(), |r, (object_type, version, body)| {
            r.with_object(ObjectKey::new(object_type, version), body)
        });
    Handler::new(resolver, MemoryLedger::new())
}
