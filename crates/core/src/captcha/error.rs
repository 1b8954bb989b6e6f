//! Error types for the captcha module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while solving a CAPTCHA.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The OCR binary could not be found.
    #[error("OCR engine not found at path: {path}")]
    EngineNotFound { path: PathBuf },

    /// The OCR process ran but failed.
    #[error("OCR engine failed: {reason}")]
    EngineFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Recognition took longer than the configured budget.
    #[error("OCR timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The downloaded CAPTCHA bytes are not a decodable image.
    #[error("Failed to decode CAPTCHA image: {reason}")]
    BadImage { reason: String },

    /// I/O error talking to the OCR process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptchaError {
    /// Creates an engine failure with captured stderr.
    pub fn engine_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EngineFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a bad-image error.
    pub fn bad_image(reason: impl Into<String>) -> Self {
        Self::BadImage {
            reason: reason.into(),
        }
    }
}
