//! Types for the orchestrator.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Errors that end the run. Everything recoverable is absorbed into the
/// per-date attempt loop instead of surfacing here.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Portal error the loop cannot absorb (structural page breakage).
    #[error("portal error: {0}")]
    Portal(#[from] crate::portal::PortalError),

    /// CAPTCHA pipeline error the loop cannot absorb (engine missing).
    #[error("captcha error: {0}")]
    Captcha(#[from] crate::captcha::CaptchaError),

    /// Persistence error.
    #[error("persist error: {0}")]
    Persist(#[from] crate::persist::PersistError),
}

/// Terminal state of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateResolution {
    /// The result table was extracted and persisted.
    Success { records: usize },
    /// The portal answered with a legitimate empty result.
    NoRecords,
    /// The attempt budget ran out without a resolution. The gap is
    /// reported for manual follow-up, never silently filled in.
    Exhausted { attempts: u32 },
}

impl DateResolution {
    /// Short name for logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            DateResolution::Success { .. } => "success",
            DateResolution::NoRecords => "no_records",
            DateResolution::Exhausted { .. } => "exhausted",
        }
    }
}

/// Mutable attempt tracking for one date, owned by the orchestrator while
/// that date is in flight and discarded once it resolves.
#[derive(Debug, Clone)]
pub struct AttemptState {
    pub date: NaiveDate,
    /// Attempts consumed so far.
    pub attempt: u32,
    /// Outcome label of every consumed attempt, oldest first.
    pub history: Vec<&'static str>,
}

impl AttemptState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            attempt: 0,
            history: Vec::new(),
        }
    }

    /// Consume one attempt with the given outcome label.
    pub fn record(&mut self, outcome: &'static str) {
        self.attempt += 1;
        self.history.push(outcome);
    }
}

/// Whole-run accounting produced by the range driver.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Dates the run looked at.
    pub dates_processed: usize,
    /// Dates that produced records.
    pub resolved: usize,
    /// Dates the portal legitimately answered with no records.
    pub empty: usize,
    /// Dates abandoned after the attempt budget; need manual follow-up.
    pub exhausted: Vec<NaiveDate>,
    /// Total records written across all dates.
    pub records_written: usize,
}
