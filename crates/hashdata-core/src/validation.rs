//! Key validation: keeps object keys inside the content root.
//!
//! A key part becomes a path segment (`<type>/<version>.json`), so each part
//! must be exactly one normal path component.

use std::path::{Component, Path};

use crate::error::CoreError;
use crate::types::ObjectKey;

/// Longest accepted key part, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Validate a defaulted key.
///
/// Empty parts are rejected here; call [`ObjectKey::with_defaults`] first.
pub fn validate_key(key: &ObjectKey) -> Result<(), CoreError> {
    validate_segment("type", &key.object_type)?;
    validate_segment("version", &key.version)?;
    Ok(())
}

/// Validate one key part as a single safe path segment.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), CoreError> {
    let invalid = |reason| CoreError::InvalidKey { field, reason };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.len() > MAX_SEGMENT_LEN {
        return Err(invalid("too long"));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(invalid("must not contain path separators or NUL"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid("must not contain control characters"));
    }

    // Catches ".", "..", and platform prefixes such as "C:".
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == value => Ok(()),
        _ => Err(invalid("must be a single path component")),
    }
}
