//! Filesystem content resolver.
//!
//! Objects live at `<root>/<type>/<version>.json`. The root is fixed at
//! construction and keys are validated before any path is built, so a
//! request can never read outside it.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hashdata_core::{validate_key, ObjectContent, ObjectKey};

use crate::error::{Result, StoreError};
use crate::traits::ContentResolver;

/// Reads object content from a directory tree.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    /// Create a resolver rooted at `root`.
    ///
    /// The directory does not have to exist yet; lookups against a missing
    /// root report [`StoreError::NotFound`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `key`, after validation.
    pub fn path_for(&self, key: &ObjectKey) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key.relative_path()))
    }
}

#[async_trait]
impl ContentResolver for FsResolver {
    async fn resolve(&self, key: &ObjectKey) -> Result<ObjectContent> {
        let path = self.path_for(key)?;
        tracing::debug!(path = %path.display(), "reading object");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.clone()),
            _ => StoreError::Io {
                key: key.clone(),
                source: e,
            },
        })?;

        ObjectContent::from_bytes(bytes).map_err(|source| StoreError::InvalidContent {
            key: key.clone(),
            source,
        })
    }
}
