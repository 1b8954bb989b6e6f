//! Per-date retrieval orchestration.
//!
//! `DateOrchestrator` drives the fetch-solve-submit-classify cycle for one
//! date under a bounded attempt budget; `RangeDriver` sequences it over the
//! configured calendar range, strictly one date at a time. Dates are never
//! interleaved: the session's CSRF token and CAPTCHA are single-use, so
//! concurrent submissions would invalidate each other.

mod config;
mod driver;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use driver::RangeDriver;
pub use runner::DateOrchestrator;
pub use types::{AttemptState, DateResolution, OrchestratorError, RunSummary};
