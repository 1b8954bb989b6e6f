//! Per-date attempt loop.
//!
//! One date moves through: fetch form state, solve the CAPTCHA, submit,
//! classify, then either resolve or burn an attempt and go around again
//! with fresh form state. A token/CAPTCHA pair is never reused.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::captcha::{CaptchaError, CaptchaSolver};
use crate::config::QueryConfig;
use crate::persist::ArtifactPersister;
use crate::portal::{PortalError, PortalGateway, SubmissionPayload};
use crate::response::{classify, SubmissionOutcome};

use super::config::OrchestratorConfig;
use super::types::{AttemptState, DateResolution, OrchestratorError};

/// Drives one date to a terminal resolution within the attempt budget.
pub struct DateOrchestrator {
    config: OrchestratorConfig,
    query: QueryConfig,
    gateway: Arc<dyn PortalGateway>,
    solver: CaptchaSolver,
    persister: ArtifactPersister,
}

impl DateOrchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        config: OrchestratorConfig,
        query: QueryConfig,
        gateway: Arc<dyn PortalGateway>,
        solver: CaptchaSolver,
        persister: ArtifactPersister,
    ) -> Self {
        Self {
            config,
            query,
            gateway,
            solver,
            persister,
        }
    }

    /// Run one date until it resolves or the budget is exhausted.
    ///
    /// Recoverable outcomes (wrong CAPTCHA, missing table, transient
    /// submit/OCR failures) consume attempts; `PortalError::Unavailable`
    /// abandons the date without consuming one, since no CAPTCHA was spent.
    /// Only structural errors propagate and end the run.
    pub async fn run_date(&self, date: NaiveDate) -> Result<DateResolution, OrchestratorError> {
        let mut state = AttemptState::new(date);

        while state.attempt < self.config.max_retries {
            info!(
                date = %date,
                attempt = state.attempt + 1,
                max_retries = self.config.max_retries,
                "Starting attempt"
            );

            let form = match self.gateway.fetch_form_state().await {
                Ok(form) => form,
                Err(PortalError::Unavailable { attempts, reason }) => {
                    warn!(
                        date = %date,
                        fetch_attempts = attempts,
                        reason = %reason,
                        "Portal unavailable, abandoning date"
                    );
                    return Ok(DateResolution::Exhausted {
                        attempts: state.attempt,
                    });
                }
                Err(e) => return Err(e.into()),
            };

            let guess = match self.solver.solve(&form.captcha_image).await {
                Ok(guess) => guess,
                Err(e @ CaptchaError::EngineNotFound { .. }) => return Err(e.into()),
                Err(e) => {
                    warn!(date = %date, error = %e, "CAPTCHA solving failed, retrying");
                    state.record("ocr_error");
                    self.pause().await;
                    continue;
                }
            };

            if !guess.is_reliable() {
                debug!(date = %date, "Submitting low-confidence guess");
            }

            let payload = SubmissionPayload {
                csrf_token: form.csrf_token,
                bench: self.query.bench.clone(),
                appeal_type: self.query.appeal_type.clone(),
                order_date: date,
                captcha_text: guess.text,
            };

            let html = match self.gateway.submit(&payload).await {
                Ok(html) => html,
                Err(e) if e.is_transient() => {
                    warn!(date = %date, error = %e, "Submission failed, retrying");
                    state.record("submit_error");
                    self.pause().await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let outcome = classify(&html, date);
            state.record(outcome.label());
            debug!(date = %date, outcome = outcome.label(), "Classified response");

            match outcome {
                SubmissionOutcome::WrongCaptcha | SubmissionOutcome::TableMissing => {
                    self.pause().await;
                }
                SubmissionOutcome::NoRecords => {
                    info!(date = %date, "No records for date");
                    return Ok(DateResolution::NoRecords);
                }
                SubmissionOutcome::Success(records) => {
                    let written = self.persister.persist(&records, date).await?;
                    info!(date = %date, records = written, "Date resolved");
                    return Ok(DateResolution::Success { records: written });
                }
            }
        }

        warn!(
            date = %date,
            attempts = state.attempt,
            history = ?state.history,
            "Attempt budget exhausted"
        );
        Ok(DateResolution::Exhausted {
            attempts: state.attempt,
        })
    }

    async fn pause(&self) {
        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OcrConfig;
    use crate::persist::{BlobStore, RecordSink};
    use crate::testing::{
        fixtures, MemoryBlobStore, MemoryRecordSink, MockOcr, MockPortal, RecordingHandler,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 6).unwrap()
    }

    fn query() -> QueryConfig {
        QueryConfig {
            bench: "199".to_string(),
            appeal_type: "ITA".to_string(),
            from: date(),
            to: date(),
        }
    }

    fn orchestrator(
        portal: Arc<MockPortal>,
        max_retries: u32,
    ) -> (DateOrchestrator, Arc<MemoryRecordSink>, Arc<MemoryBlobStore>) {
        let sink = Arc::new(MemoryRecordSink::default());
        let store = Arc::new(MemoryBlobStore::default());

        let solver = CaptchaSolver::new(
            Arc::new(MockOcr::returning("X7K2M")),
            Arc::new(RecordingHandler::default()),
            OcrConfig::default(),
        );
        let persister = ArtifactPersister::new(
            Arc::clone(&portal) as Arc<dyn PortalGateway>,
            Arc::clone(&sink) as Arc<dyn RecordSink>,
            Arc::clone(&store) as Arc<dyn BlobStore>,
            "https://itat.gov.in",
        );

        let config = OrchestratorConfig {
            max_retries,
            retry_delay_ms: 0,
        };

        (
            DateOrchestrator::new(config, query(), portal, solver, persister),
            sink,
            store,
        )
    }

    #[tokio::test]
    async fn test_success_resolves_and_persists() {
        let portal = Arc::new(MockPortal::new());
        portal.push_response(fixtures::RESULTS_PAGE).await;
        let (orchestrator, sink, _) = orchestrator(Arc::clone(&portal), 10);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::Success { records: 2 });
        assert_eq!(portal.submissions().await.len(), 1);
        assert_eq!(sink.written().await.len(), 1);
    }

    #[tokio::test]
    async fn test_no_records_is_terminal_without_persistence() {
        let portal = Arc::new(MockPortal::new());
        portal.push_response(fixtures::NO_RECORDS_PAGE).await;
        let (orchestrator, sink, _) = orchestrator(Arc::clone(&portal), 10);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::NoRecords);
        assert_eq!(portal.submissions().await.len(), 1);
        assert!(sink.written().await.is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_after_exactly_max_retries() {
        let portal = Arc::new(MockPortal::new());
        for _ in 0..5 {
            portal.push_response(fixtures::WRONG_CAPTCHA_PAGE).await;
        }
        let (orchestrator, sink, _) = orchestrator(Arc::clone(&portal), 3);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::Exhausted { attempts: 3 });
        // Exactly 3 submissions, nothing persisted.
        assert_eq!(portal.submissions().await.len(), 3);
        assert!(sink.written().await.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_captcha_then_success_uses_fresh_form_state() {
        let portal = Arc::new(MockPortal::new());
        portal.push_response(fixtures::WRONG_CAPTCHA_PAGE).await;
        portal.push_response(fixtures::RESULTS_PAGE).await;
        let (orchestrator, _, _) = orchestrator(Arc::clone(&portal), 10);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::Success { records: 2 });

        // Two attempts, each with its own token.
        let submissions = portal.submissions().await;
        assert_eq!(submissions.len(), 2);
        assert_ne!(submissions[0].csrf_token, submissions[1].csrf_token);
        assert_eq!(portal.form_state_fetches().await, 2);
    }

    #[tokio::test]
    async fn test_table_missing_is_retried_like_wrong_captcha() {
        let portal = Arc::new(MockPortal::new());
        portal.push_response("<html><body>odd page</body></html>").await;
        portal.push_response(fixtures::NO_RECORDS_PAGE).await;
        let (orchestrator, _, _) = orchestrator(Arc::clone(&portal), 10);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::NoRecords);
        assert_eq!(portal.submissions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_portal_unavailable_abandons_date() {
        let portal = Arc::new(MockPortal::new());
        portal.fail_form_state_unavailable().await;
        let (orchestrator, _, _) = orchestrator(Arc::clone(&portal), 10);

        let resolution = orchestrator.run_date(date()).await.unwrap();
        assert_eq!(resolution, DateResolution::Exhausted { attempts: 0 });
        assert!(portal.submissions().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_page_is_fatal() {
        let portal = Arc::new(MockPortal::new());
        portal.fail_form_state_malformed().await;
        let (orchestrator, _, _) = orchestrator(Arc::clone(&portal), 10);

        let err = orchestrator.run_date(date()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Portal(e) if e.is_fatal()));
    }

    #[tokio::test]
    async fn test_submitted_payload_carries_query_config() {
        let portal = Arc::new(MockPortal::new());
        portal.push_response(fixtures::NO_RECORDS_PAGE).await;
        let (orchestrator, _, _) = orchestrator(Arc::clone(&portal), 10);

        orchestrator.run_date(date()).await.unwrap();
        let submissions = portal.submissions().await;
        assert_eq!(submissions[0].bench, "199");
        assert_eq!(submissions[0].appeal_type, "ITA");
        assert_eq!(submissions[0].order_date, date());
        assert_eq!(submissions[0].captcha_text, "X7K2M");
    }
}
