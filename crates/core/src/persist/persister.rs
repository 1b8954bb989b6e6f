use chrono::NaiveDate;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::portal::PortalGateway;
use crate::response::OrderRecord;

use super::error::PersistError;
use super::traits::{BlobStore, RecordSink};

/// Longest appeal-number prefix used in a document filename.
const FILENAME_APPEAL_LIMIT: usize = 50;

/// Writes a resolved date's records to the sink and pulls each linked
/// document into the blob store over the run's session.
pub struct ArtifactPersister {
    gateway: Arc<dyn PortalGateway>,
    sink: Arc<dyn RecordSink>,
    store: Arc<dyn BlobStore>,
    origin: String,
}

impl ArtifactPersister {
    pub fn new(
        gateway: Arc<dyn PortalGateway>,
        sink: Arc<dyn RecordSink>,
        store: Arc<dyn BlobStore>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            sink,
            store,
            origin: origin.into(),
        }
    }

    /// Persist all records for a resolved date. Returns the number of
    /// records written to the sink.
    ///
    /// A failed document download is logged and skipped: the record row,
    /// link included, is already in the sink for manual follow-up, and one
    /// broken link must not fail the date.
    pub async fn persist(
        &self,
        records: &[OrderRecord],
        date: NaiveDate,
    ) -> Result<usize, PersistError> {
        if records.is_empty() {
            debug!(date = %date, "No records to persist");
            return Ok(0);
        }

        self.sink.write_records(date, records).await?;

        let mut documents = 0;
        for record in records.iter().filter(|r| !r.order_link.is_empty()) {
            let url = match Url::parse(&self.origin).and_then(|o| o.join(&record.order_link)) {
                Ok(url) => url,
                Err(e) => {
                    warn!(
                        link = %record.order_link,
                        error = %e,
                        "Skipping document with unresolvable link"
                    );
                    continue;
                }
            };

            match self.gateway.download(url.as_str()).await {
                Ok(bytes) => {
                    let filename = document_filename(&record.appeal_number, date);
                    self.store.put(&filename, &bytes).await?;
                    documents += 1;
                }
                Err(e) => {
                    warn!(
                        url = %url,
                        appeal = %record.appeal_number,
                        error = %e,
                        "Document download failed, continuing"
                    );
                }
            }
        }

        info!(
            date = %date,
            records = records.len(),
            documents = documents,
            "Persisted date"
        );
        Ok(records.len())
    }
}

/// Deterministic document filename for `(appeal_number, date)`.
///
/// The appeal number is truncated to 50 characters and path separators are
/// replaced. Two rows sharing a truncated appeal number on the same date
/// collide and the later download overwrites the earlier one; known
/// limitation, left as-is.
pub fn document_filename(appeal_number: &str, date: NaiveDate) -> String {
    let cleaned: String = appeal_number
        .chars()
        .take(FILENAME_APPEAL_LIMIT)
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    format!("{}_{}.pdf", cleaned, date.format("%d-%m-%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryBlobStore, MemoryRecordSink, MockPortal};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 6).unwrap()
    }

    fn record(appeal: &str, link: &str) -> OrderRecord {
        OrderRecord {
            order_date: date(),
            appeal_number: appeal.to_string(),
            assessment_year: "2008-09".to_string(),
            case_status: "Disposed".to_string(),
            parties: "A vs B".to_string(),
            alpha_bench: "A".to_string(),
            order_link: link.to_string(),
        }
    }

    fn persister(
        portal: Arc<MockPortal>,
    ) -> (ArtifactPersister, Arc<MemoryRecordSink>, Arc<MemoryBlobStore>) {
        let sink = Arc::new(MemoryRecordSink::default());
        let store = Arc::new(MemoryBlobStore::default());
        let persister = ArtifactPersister::new(
            portal,
            Arc::clone(&sink) as Arc<dyn RecordSink>,
            Arc::clone(&store) as Arc<dyn BlobStore>,
            "https://itat.gov.in",
        );
        (persister, sink, store)
    }

    #[test]
    fn test_document_filename_is_deterministic() {
        let a = document_filename("ITA 123/Mum/2010", date());
        let b = document_filename("ITA 123/Mum/2010", date());
        assert_eq!(a, b);
        assert_eq!(a, "ITA 123_Mum_2010_06-03-2010.pdf");
    }

    #[test]
    fn test_document_filename_truncates_long_appeals() {
        let long = "X".repeat(80);
        let name = document_filename(&long, date());
        assert_eq!(name, format!("{}_06-03-2010.pdf", "X".repeat(50)));
    }

    #[tokio::test]
    async fn test_persist_writes_records_and_documents() {
        let portal = Arc::new(MockPortal::new());
        portal.set_document(b"%PDF fake".to_vec()).await;
        let (persister, sink, store) = persister(Arc::clone(&portal));

        let records = vec![
            record("ITA 1/Mum/2010", "/judicial/orders/1.pdf"),
            record("ITA 2/Mum/2010", ""),
        ];

        let written = persister.persist(&records, date()).await.unwrap();
        assert_eq!(written, 2);

        let sink_calls = sink.written().await;
        assert_eq!(sink_calls.len(), 1);
        assert_eq!(sink_calls[0].1.len(), 2);

        // Only the record with a link produces a document.
        let blobs = store.blobs().await;
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].0, "ITA 1_Mum_2010_06-03-2010.pdf");

        let downloads = portal.downloads().await;
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0], "https://itat.gov.in/judicial/orders/1.pdf");
    }

    #[tokio::test]
    async fn test_persist_empty_is_a_no_op() {
        let portal = Arc::new(MockPortal::new());
        let (persister, sink, store) = persister(portal);

        let written = persister.persist(&[], date()).await.unwrap();
        assert_eq!(written, 0);
        assert!(sink.written().await.is_empty());
        assert!(store.blobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_is_skipped_not_fatal() {
        let portal = Arc::new(MockPortal::new());
        portal.fail_downloads().await;
        let (persister, _sink, store) = persister(Arc::clone(&portal));

        let records = vec![record("ITA 1/Mum/2010", "/judicial/orders/1.pdf")];
        let written = persister.persist(&records, date()).await.unwrap();

        assert_eq!(written, 1);
        assert!(store.blobs().await.is_empty());
    }
}
