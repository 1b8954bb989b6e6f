//! Error types for the persist module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting records or documents.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Output directory could not be created.
    #[error("failed to create output directory: {path}")]
    DirectoryFailed { path: PathBuf },

    /// Writing a sink or store file failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error outside a specific file write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
