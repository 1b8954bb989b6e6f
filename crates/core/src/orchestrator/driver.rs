//! Calendar-range sequencing.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::runner::DateOrchestrator;
use super::types::{DateResolution, OrchestratorError, RunSummary};

/// Walks every date in an inclusive range through the orchestrator, one at
/// a time, in ascending order. There is no crawl cursor: a date is only
/// revisited by explicitly re-running the range.
pub struct RangeDriver {
    orchestrator: DateOrchestrator,
}

impl RangeDriver {
    pub fn new(orchestrator: DateOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Process `[from, to]` inclusive and return the run's accounting.
    ///
    /// Per-date failures are contained: an exhausted date is recorded and
    /// the run moves on. Only structural errors (a changed page contract,
    /// a missing OCR engine) abort the run.
    pub async fn run(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RunSummary, OrchestratorError> {
        let mut summary = RunSummary::default();
        let mut date = from;

        while date <= to {
            let resolution = self.orchestrator.run_date(date).await?;
            summary.dates_processed += 1;

            match resolution {
                DateResolution::Success { records } => {
                    summary.resolved += 1;
                    summary.records_written += records;
                }
                DateResolution::NoRecords => {
                    summary.empty += 1;
                }
                DateResolution::Exhausted { attempts } => {
                    warn!(
                        date = %date,
                        attempts = attempts,
                        "Date left unresolved, recorded for manual follow-up"
                    );
                    summary.exhausted.push(date);
                }
            }

            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        if summary.exhausted.is_empty() {
            info!(
                dates = summary.dates_processed,
                records = summary.records_written,
                "Run complete"
            );
        } else {
            warn!(
                dates = summary.dates_processed,
                unresolved = summary.exhausted.len(),
                "Run complete with unresolved dates"
            );
        }

        Ok(summary)
    }
}
