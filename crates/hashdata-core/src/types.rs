//! Strong type definitions for hashdata.
//!
//! Keys and content are newtypes so an unvalidated string never reaches the
//! resolver or the ledger by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Object type used when the caller leaves `type` empty.
pub const DEFAULT_TYPE: &str = "core";

/// Version used when the caller leaves `version` empty.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// The `(type, version)` pair identifying one logical object.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    #[serde(rename = "type")]
    pub object_type: String,
    pub version: String,
}

impl ObjectKey {
    /// Build a key exactly as given. No defaults, no validation.
    pub fn new(object_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            version: version.into(),
        }
    }

    /// Build a key, substituting [`DEFAULT_TYPE`] / [`DEFAULT_VERSION`] for
    /// empty parts.
    pub fn with_defaults(object_type: impl Into<String>, version: impl Into<String>) -> Self {
        let mut key = Self::new(object_type, version);
        if key.object_type.is_empty() {
            key.object_type = DEFAULT_TYPE.to_string();
        }
        if key.version.is_empty() {
            key.version = DEFAULT_VERSION.to_string();
        }
        key
    }

    /// Relative location of the object inside a content root:
    /// `<type>/<version>.json`.
    pub fn relative_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.object_type).join(format!("{}.json", self.version))
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({}@{})", self.object_type, self.version)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type, self.version)
    }
}

/// Immutable content of one object, as loaded from the backing store.
///
/// Always valid UTF-8: it is persisted as TEXT and returned inside a JSON
/// string.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectContent(String);

impl ObjectContent {
    /// Accept raw bytes, rejecting anything that is not UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CoreError> {
        String::from_utf8(bytes)
            .map(Self)
            .map_err(|e| CoreError::InvalidUtf8(e.utf8_error().valid_up_to()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 over the exact bytes.
    pub fn digest(&self) -> Sha256Hash {
        Sha256Hash::hash(self.as_bytes())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ObjectContent {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectContent {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectContent({} bytes)", self.0.len())
    }
}

/// Envelope for the `read_data` call, used in both directions.
///
/// Inbound, `hash` is the digest the caller claims to hold and `content` is
/// ignored. Outbound, `hash` is the computed digest and `content` is empty
/// when the claim matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub object_type: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub version: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
}

/// A JSON `null` decodes the same as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Data {
    /// The key this request names, with defaults applied.
    pub fn key(&self) -> ObjectKey {
        ObjectKey::with_defaults(self.object_type.as_str(), self.version.as_str())
    }

    /// Build the response for `key`.
    ///
    /// `content` is left empty when `claimed` already names `hash`.
    pub fn response(key: &ObjectKey, hash: &Sha256Hash, claimed: &str, content: &ObjectContent) -> Self {
        let content = if hash.matches_claim(claimed) {
            String::new()
        } else {
            content.as_str().to_string()
        };

        Self {
            object_type: key.object_type.clone(),
            version: key.version.clone(),
            hash: hash.to_hex(),
            content,
        }
    }
}
