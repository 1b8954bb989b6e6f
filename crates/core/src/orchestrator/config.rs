//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the per-date attempt loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Submission attempts allowed per date before the date is abandoned.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between attempts on the same date (milliseconds). Keeps the
    /// submission endpoint from seeing a burst of failed CAPTCHAs.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    10
}

fn default_retry_delay() -> u64 {
    1000 // 1 second
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}
