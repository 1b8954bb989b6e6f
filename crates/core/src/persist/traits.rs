//! Trait definitions for the persist module.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::response::OrderRecord;

use super::error::PersistError;

/// Tabular destination for extracted records, keyed by date so per-date runs
/// stay independent and resumable.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Returns the name of this sink implementation.
    fn name(&self) -> &str;

    /// Write all records for one date; returns the path written.
    async fn write_records(
        &self,
        date: NaiveDate,
        records: &[OrderRecord],
    ) -> Result<PathBuf, PersistError>;
}

/// Binary destination for downloaded order documents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Store one document under the given filename; returns the path
    /// written. An existing file with the same name is overwritten.
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError>;
}
