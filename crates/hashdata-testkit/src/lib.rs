//! # Hashdata Testkit
//!
//! Testing utilities for hashdata.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known SHA-256 digests that every ledger must reproduce
//! - **Generators**: Proptest strategies for keys, requests, and content
//! - **Fixtures**: Temporary content trees and ready-made handlers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use hashdata_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hashdata_testkit::generators::object_key;
//!
//! proptest! {
//!     #[test]
//!     fn keys_are_valid(key in object_key()) {
//!         prop_assert!(hashdata_core::validate_key(&key).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use hashdata_testkit::fixtures::ContentTree;
//!
//! let tree = ContentTree::new().with_object("guild", "2.0.0", "{\"x\":1}");
//! let handler = tree.sqlite_handler();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{memory_handler, ContentTree};
pub use generators::{object_key, request, ObjectParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
