//! In-memory persistence doubles and a recording fallback handler.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::captcha::{CaptchaGuess, LowConfidenceHandler};
use crate::persist::{BlobStore, PersistError, RecordSink};
use crate::response::OrderRecord;

/// Record sink that keeps everything in memory for assertions.
#[derive(Default)]
pub struct MemoryRecordSink {
    written: Arc<RwLock<Vec<(NaiveDate, Vec<OrderRecord>)>>>,
}

impl MemoryRecordSink {
    /// Every `write_records` call, in order.
    pub async fn written(&self) -> Vec<(NaiveDate, Vec<OrderRecord>)> {
        self.written.read().await.clone()
    }
}

#[async_trait]
impl RecordSink for MemoryRecordSink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write_records(
        &self,
        date: NaiveDate,
        records: &[OrderRecord],
    ) -> Result<PathBuf, PersistError> {
        self.written.write().await.push((date, records.to_vec()));
        Ok(PathBuf::from(format!("memory://records/{}", date)))
    }
}

/// Blob store that keeps documents in memory for assertions.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
}

impl MemoryBlobStore {
    /// Every stored `(filename, bytes)` pair, in order.
    pub async fn blobs(&self) -> Vec<(String, Vec<u8>)> {
        self.blobs.read().await.clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        self.blobs
            .write()
            .await
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(format!("memory://blobs/{}", filename)))
    }
}

/// Fallback handler that passes guesses through unchanged and counts how
/// often the quality gate routed to it.
#[derive(Default)]
pub struct RecordingHandler {
    invocations: Arc<RwLock<u32>>,
}

impl RecordingHandler {
    /// How many low-confidence guesses reached the handler.
    pub async fn invocations(&self) -> u32 {
        *self.invocations.read().await
    }
}

#[async_trait]
impl LowConfidenceHandler for RecordingHandler {
    fn name(&self) -> &str {
        "recording"
    }

    async fn resolve(&self, guess: CaptchaGuess) -> CaptchaGuess {
        *self.invocations.write().await += 1;
        guess
    }
}
