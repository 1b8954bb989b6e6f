use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::orchestrator::OrchestratorConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub query: QueryConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// The query the run submits for every date in the range.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Bench (tribunal location/division) code, e.g. "199" for Mumbai.
    pub bench: String,
    /// Appeal-type code submitted with every query.
    #[serde(default = "default_appeal_type")]
    pub appeal_type: String,
    /// First order date to query (inclusive).
    pub from: NaiveDate,
    /// Last order date to query (inclusive).
    pub to: NaiveDate,
}

fn default_appeal_type() -> String {
    "ITA".to_string()
}

/// Portal endpoints and session behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortalConfig {
    /// Query page URL (GET for form state, POST for submissions).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Origin that relative document links are resolved against.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// User-Agent pool; one entry is pinned to the session for the run.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Max attempts for the initial page fetch before the date is abandoned.
    #[serde(default = "default_fetch_attempts")]
    pub fetch_max_attempts: u32,
    /// Base backoff delay in seconds; doubles per fetch attempt (2, 4, 8, ...).
    #[serde(default = "default_fetch_backoff")]
    pub fetch_backoff_base_secs: u64,
    /// Fixed delay before downloading the CAPTCHA image, in milliseconds.
    #[serde(default = "default_captcha_delay")]
    pub captcha_delay_ms: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            origin: default_origin(),
            user_agents: default_user_agents(),
            timeout_secs: default_timeout(),
            fetch_max_attempts: default_fetch_attempts(),
            fetch_backoff_base_secs: default_fetch_backoff(),
            captcha_delay_ms: default_captcha_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://itat.gov.in/judicial/tribunalorders".to_string()
}

fn default_origin() -> String {
    "https://itat.gov.in".to_string()
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
        "Mozilla/5.0 (X11; Linux x86_64)",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 13_6 like Mac OS X)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_timeout() -> u32 {
    30
}

fn default_fetch_attempts() -> u32 {
    5
}

fn default_fetch_backoff() -> u64 {
    2
}

fn default_captcha_delay() -> u64 {
    2000
}

/// CAPTCHA recognition tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OcrConfig {
    /// Path to the tesseract binary.
    #[serde(default = "default_tesseract_bin")]
    pub tesseract_bin: PathBuf,
    /// Binarization threshold (0-255). The portal's CAPTCHA noise profile
    /// drifts, so this is tunable rather than baked in.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Linear upscale factor applied before recognition.
    #[serde(default = "default_upscale")]
    pub upscale: u32,
    /// Characters tesseract is allowed to emit.
    #[serde(default = "default_whitelist")]
    pub whitelist: String,
    /// Tesseract page segmentation mode (8 = single word).
    #[serde(default = "default_psm")]
    pub psm: u8,
    /// Recognition timeout in seconds.
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_bin: default_tesseract_bin(),
            threshold: default_threshold(),
            upscale: default_upscale(),
            whitelist: default_whitelist(),
            psm: default_psm(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

fn default_tesseract_bin() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_threshold() -> u8 {
    150
}

fn default_upscale() -> u32 {
    3
}

fn default_whitelist() -> String {
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string()
}

fn default_psm() -> u8 {
    8
}

fn default_ocr_timeout() -> u64 {
    10
}

/// Where records, documents and diagnostic snapshots land.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for the per-date CSV record files.
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
    /// Directory for downloaded order documents.
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,
    /// Directory for raw page snapshots captured on structural failures.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
            documents_dir: default_documents_dir(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

fn default_records_dir() -> PathBuf {
    PathBuf::from("orders")
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("pdfs")
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}
