//! Range-driver lifecycle integration tests.
//!
//! These drive whole runs against the mock portal: mixed per-date outcomes,
//! attempt exhaustion, structural aborts, and real on-disk persistence.

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use retriever_core::{
    testing::{fixtures, MemoryBlobStore, MemoryRecordSink, MockOcr, MockPortal, RecordingHandler},
    ArtifactPersister, BlobStore, CaptchaSolver, CsvRecordSink, DateOrchestrator, FsBlobStore,
    OcrConfig, OrchestratorConfig, PortalGateway, QueryConfig, RangeDriver, RecordSink,
};

/// Test helper wiring the orchestrator stack over in-memory doubles.
struct TestHarness {
    portal: Arc<MockPortal>,
    sink: Arc<MemoryRecordSink>,
    store: Arc<MemoryBlobStore>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            portal: Arc::new(MockPortal::new()),
            sink: Arc::new(MemoryRecordSink::default()),
            store: Arc::new(MemoryBlobStore::default()),
        }
    }

    fn driver(&self, max_retries: u32) -> RangeDriver {
        let solver = CaptchaSolver::new(
            Arc::new(MockOcr::returning("X7K2M")),
            Arc::new(RecordingHandler::default()),
            OcrConfig::default(),
        );

        let persister = ArtifactPersister::new(
            Arc::clone(&self.portal) as Arc<dyn PortalGateway>,
            Arc::clone(&self.sink) as Arc<dyn RecordSink>,
            Arc::clone(&self.store) as Arc<dyn BlobStore>,
            "https://itat.gov.in",
        );

        let orchestrator = DateOrchestrator::new(
            OrchestratorConfig {
                max_retries,
                retry_delay_ms: 0,
            },
            QueryConfig {
                bench: "199".to_string(),
                appeal_type: "ITA".to_string(),
                from: date(1),
                to: date(3),
            },
            Arc::clone(&self.portal) as Arc<dyn PortalGateway>,
            solver,
            persister,
        );

        RangeDriver::new(orchestrator)
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 3, day).unwrap()
}

#[tokio::test]
async fn test_run_resolves_every_date_in_order() {
    let harness = TestHarness::new();
    harness.portal.push_response(fixtures::RESULTS_PAGE).await;
    harness.portal.push_response(fixtures::NO_RECORDS_PAGE).await;
    harness.portal.push_response(fixtures::RESULTS_PAGE).await;

    let summary = harness.driver(10).run(date(1), date(3)).await.unwrap();

    assert_eq!(summary.dates_processed, 3);
    assert_eq!(summary.resolved, 2);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.records_written, 4);
    assert!(summary.exhausted.is_empty());

    // Dates were persisted in ascending order, one sink write per
    // resolved date.
    let written = harness.sink.written().await;
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].0, date(1));
    assert_eq!(written[1].0, date(3));

    // Each results page carries one linked document.
    assert_eq!(harness.store.blobs().await.len(), 2);
}

#[tokio::test]
async fn test_exhausted_date_is_reported_and_run_continues() {
    let harness = TestHarness::new();
    // Date 1 resolves; date 2 burns its whole budget on rejections; date 3
    // resolves empty (the mock's dry-queue default).
    harness.portal.push_response(fixtures::RESULTS_PAGE).await;
    harness.portal.push_response(fixtures::WRONG_CAPTCHA_PAGE).await;
    harness.portal.push_response(fixtures::WRONG_CAPTCHA_PAGE).await;

    let summary = harness.driver(2).run(date(1), date(3)).await.unwrap();

    assert_eq!(summary.dates_processed, 3);
    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.exhausted, vec![date(2)]);

    // 1 submission for date 1, exactly 2 for date 2, 1 for date 3.
    assert_eq!(harness.portal.submissions().await.len(), 4);
}

#[tokio::test]
async fn test_structural_page_change_aborts_the_run() {
    let harness = TestHarness::new();
    harness.portal.fail_form_state_malformed().await;

    let result = harness.driver(10).run(date(1), date(3)).await;
    assert!(result.is_err());
    assert!(harness.portal.submissions().await.is_empty());
}

#[tokio::test]
async fn test_unavailable_portal_abandons_dates_without_submissions() {
    let harness = TestHarness::new();
    harness.portal.fail_form_state_unavailable().await;

    let summary = harness.driver(10).run(date(1), date(2)).await.unwrap();

    assert_eq!(summary.dates_processed, 2);
    assert_eq!(summary.exhausted, vec![date(1), date(2)]);
    assert!(harness.portal.submissions().await.is_empty());
}

#[tokio::test]
async fn test_run_with_filesystem_persistence() {
    let records_dir = TempDir::new().unwrap();
    let documents_dir = TempDir::new().unwrap();

    let portal = Arc::new(MockPortal::new());
    portal.push_response(fixtures::RESULTS_PAGE).await;
    portal.set_document(b"%PDF-1.4 order body".to_vec()).await;

    let solver = CaptchaSolver::new(
        Arc::new(MockOcr::returning("X7K2M")),
        Arc::new(RecordingHandler::default()),
        OcrConfig::default(),
    );
    let persister = ArtifactPersister::new(
        Arc::clone(&portal) as Arc<dyn PortalGateway>,
        Arc::new(CsvRecordSink::new(records_dir.path())) as Arc<dyn RecordSink>,
        Arc::new(FsBlobStore::new(documents_dir.path())) as Arc<dyn BlobStore>,
        "https://itat.gov.in",
    );
    let orchestrator = DateOrchestrator::new(
        OrchestratorConfig {
            max_retries: 10,
            retry_delay_ms: 0,
        },
        QueryConfig {
            bench: "199".to_string(),
            appeal_type: "ITA".to_string(),
            from: date(6),
            to: date(6),
        },
        Arc::clone(&portal) as Arc<dyn PortalGateway>,
        solver,
        persister,
    );

    let summary = RangeDriver::new(orchestrator)
        .run(date(6), date(6))
        .await
        .unwrap();
    assert_eq!(summary.records_written, 2);

    let csv_path = records_dir.path().join("itat_orders_06-03-2010.csv");
    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.starts_with("Order Date,Appeal Number"));
    assert!(contents.contains("ITA 1001/Mum/2009"));

    let pdf_path = documents_dir
        .path()
        .join("ITA 1001_Mum_2009_06-03-2010.pdf");
    assert_eq!(std::fs::read(&pdf_path).unwrap(), b"%PDF-1.4 order body");
}
