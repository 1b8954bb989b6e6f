//! Trait definitions for the portal module.

use async_trait::async_trait;

use super::error::PortalError;
use super::types::{FormState, SubmissionPayload};

/// The portal as the orchestrator sees it: fetch fresh form state, submit a
/// query, download a linked document. All three operations share one
/// session; implementations own that state exclusively.
#[async_trait]
pub trait PortalGateway: Send + Sync {
    /// Fetch the query page and its CAPTCHA, producing single-use form
    /// state. Applies its own transport backoff; exhaustion surfaces as
    /// `PortalError::Unavailable`, structural breakage as
    /// `PortalError::MalformedPage`.
    async fn fetch_form_state(&self) -> Result<FormState, PortalError>;

    /// Submit a query and return the raw HTML response. No retry logic
    /// here: only the orchestrator knows the per-date attempt budget.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, PortalError>;

    /// Download a document by absolute URL over the same session.
    async fn download(&self, url: &str) -> Result<Vec<u8>, PortalError>;
}
