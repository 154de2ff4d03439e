//! # Hashdata
//!
//! Fetch-or-confirm access to versioned content, backed by a write-once
//! integrity ledger.
//!
//! ## Overview
//!
//! A caller names an object by `(type, version)` and may send the digest of
//! the copy it already holds. The handler:
//!
//! - **Resolves** the authoritative content from the content store
//! - **Records** the object in the ledger, which computes its SHA-256
//! - **Responds** with the digest, and the content only if the caller's
//!   digest was missing or wrong
//!
//! ## Key Concepts
//!
//! - **Object key**: `(type, version)`; empty parts default to `core` / `1.0.0`.
//! - **Ledger record**: written once per key, never updated or deleted.
//! - **Write-once reads**: the first call for a key records it; later calls
//!   for the same key fail with `AlreadyExists`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hashdata::{Handler, Module, RPC_READ_DATA};
//! use hashdata::store::{FsResolver, SqliteLedger};
//!
//! async fn example() {
//!     let ledger = SqliteLedger::open("hashdata.db").unwrap();
//!     let handler = Handler::new(FsResolver::new("/var/lib/hashdata/data"), ledger);
//!     let module = Module::init(handler);
//!
//!     let response = module
//!         .dispatch(RPC_READ_DATA, r#"{"type":"guild","version":"2.0.0"}"#)
//!         .await
//!         .unwrap();
//!     println!("{response}");
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `hashdata::core` - Keys, digests, the request envelope
//! - `hashdata::store` - Resolvers and ledgers

pub mod config;
pub mod error;
pub mod handler;
pub mod module;

// Re-export component crates
pub use hashdata_core as core;
pub use hashdata_store as store;

// Re-export main types for convenience
pub use config::{ConfigError, ServiceConfig};
pub use error::{HandlerError, Result};
pub use handler::Handler;
pub use module::{Module, Rpc, RPC_READ_DATA};

// Re-export commonly used core types
pub use hashdata_core::{Data, ErrorKind, ObjectContent, ObjectKey, Sha256Hash};
