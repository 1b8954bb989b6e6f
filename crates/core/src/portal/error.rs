//! Error types for the portal module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the portal.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The query page could not be fetched within the backoff budget.
    /// Fatal for the current date only.
    #[error("portal unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },

    /// Expected markup (CSRF token or CAPTCHA image) is absent. Fatal for
    /// the whole run: the portal's page contract has changed and needs human
    /// review. A raw snapshot of the page is kept when one could be written.
    #[error("portal page structure changed: {reason}")]
    MalformedPage {
        reason: String,
        snapshot: Option<PathBuf>,
    },

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status: {status}")]
    BadStatus { status: reqwest::StatusCode },

    /// Transport-level failure (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// I/O error, e.g. while writing a diagnostic snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    /// Whether a fresh request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BadStatus { .. } | Self::Transport(_))
    }

    /// Whether the error invalidates the whole run rather than one date.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedPage { .. })
    }
}
