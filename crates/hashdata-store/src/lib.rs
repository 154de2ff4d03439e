//! # Hashdata Store
//!
//! The two backing components of `read_data`: the [`ContentResolver`], which
//! loads authoritative object bytes, and the [`Ledger`], which records each
//! object's digest and content exactly once.
//!
//! ## Key Types
//!
//! - [`ContentResolver`] - Async trait for loading content by key
//! - [`FsResolver`] - Reads `<root>/<type>/<version>.json`
//! - [`Ledger`] - Async trait for write-once recording
//! - [`SqliteLedger`] - SQLite-backed `hash_data` table
//! - [`MemoryResolver`] / [`MemoryLedger`] - In-memory versions for tests
//! - [`LedgerRecord`] - One recorded row
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hashdata_core::ObjectKey;
//! use hashdata_store::{ContentResolver, FsResolver, Ledger, SqliteLedger};
//!
//! async fn example() {
//!     let resolver = FsResolver::new("/var/lib/hashdata/data");
//!     let ledger = SqliteLedger::open("hashdata.db").unwrap();
//!
//!     let key = ObjectKey::new("guild", "2.0.0");
//!     let content = resolver.resolve(&key).await.unwrap();
//!     let hash = ledger.record(&key, &content).await.unwrap();
//!     println!("{key}: {hash}");
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Write-once**: recording a key twice returns [`StoreError::AlreadyExists`]
//!   and leaves the first row untouched.
//! - **Server-side digests**: the ledger hashes the content itself.
//! - **Lazy schema**: the SQLite schema is ensured on first use and cached;
//!   a failed attempt is logged and retried on the next call.

pub mod error;
pub mod fs;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use fs::FsResolver;
pub use memory::{MemoryLedger, MemoryResolver};
pub use sqlite::{is_unique_violation, SqliteLedger};
pub use traits::{ContentResolver, Ledger, LedgerRecord};
