//! Filesystem blob store: one binary file per downloaded document.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::error::PersistError;
use super::traits::BlobStore;

/// Blob store backed by a flat directory.
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|_| PersistError::DirectoryFailed {
                path: self.dir.clone(),
            })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| PersistError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Stored document");
        Ok(path)
    }
}
