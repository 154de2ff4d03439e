//! # Hashdata Core
//!
//! Pure primitives for hashdata: object keys, content digests, and the
//! request/response envelope.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! plain data plus the rules that make a key safe to use.
//!
//! ## Key Types
//!
//! - [`ObjectKey`] - The `(type, version)` pair identifying one object
//! - [`ObjectContent`] - Immutable UTF-8 bytes loaded for a key
//! - [`Sha256Hash`] - Hex-encodable SHA-256 digest of content
//! - [`Data`] - The envelope used for both requests and responses
//!
//! ## Defaults
//!
//! Empty key parts are replaced with [`DEFAULT_TYPE`] and [`DEFAULT_VERSION`]
//! before anything else looks at them. See [`ObjectKey::with_defaults`].

pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use crypto::Sha256Hash;
pub use error::{CoreError, ErrorKind};
pub use types::{Data, ObjectContent, ObjectKey, DEFAULT_TYPE, DEFAULT_VERSION};
pub use validation::{validate_key, validate_segment};
