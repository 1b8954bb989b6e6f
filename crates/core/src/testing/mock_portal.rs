//! Mock portal gateway for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::portal::{FormState, PortalError, PortalGateway, SubmissionPayload};

use super::fixtures;

/// How `fetch_form_state` should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormStateBehavior {
    Ok,
    Unavailable,
    Malformed,
}

/// Mock implementation of the PortalGateway trait.
///
/// Scripted submit responses are consumed FIFO; when the script runs dry the
/// mock answers with the no-records page so tests terminate. Every issued
/// token is unique, which lets tests assert that form state is never reused.
pub struct MockPortal {
    form_state_behavior: Arc<RwLock<FormStateBehavior>>,
    form_state_fetches: Arc<RwLock<u32>>,
    responses: Arc<RwLock<VecDeque<String>>>,
    submissions: Arc<RwLock<Vec<SubmissionPayload>>>,
    downloads: Arc<RwLock<Vec<String>>>,
    document: Arc<RwLock<Vec<u8>>>,
    fail_downloads: Arc<RwLock<bool>>,
    captcha_image: Vec<u8>,
}

impl Default for MockPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPortal {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self {
            form_state_behavior: Arc::new(RwLock::new(FormStateBehavior::Ok)),
            form_state_fetches: Arc::new(RwLock::new(0)),
            responses: Arc::new(RwLock::new(VecDeque::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            downloads: Arc::new(RwLock::new(Vec::new())),
            document: Arc::new(RwLock::new(b"%PDF-1.4 mock".to_vec())),
            fail_downloads: Arc::new(RwLock::new(false)),
            captcha_image: fixtures::captcha_png(),
        }
    }

    /// Queue one submit response.
    pub async fn push_response(&self, html: impl Into<String>) {
        self.responses.write().await.push_back(html.into());
    }

    /// Bytes returned by every document download.
    pub async fn set_document(&self, bytes: Vec<u8>) {
        *self.document.write().await = bytes;
    }

    /// Make every download fail with a 404.
    pub async fn fail_downloads(&self) {
        *self.fail_downloads.write().await = true;
    }

    /// Make `fetch_form_state` report the portal as unavailable.
    pub async fn fail_form_state_unavailable(&self) {
        *self.form_state_behavior.write().await = FormStateBehavior::Unavailable;
    }

    /// Make `fetch_form_state` report broken page markup.
    pub async fn fail_form_state_malformed(&self) {
        *self.form_state_behavior.write().await = FormStateBehavior::Malformed;
    }

    /// Every submitted payload, in order.
    pub async fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.read().await.clone()
    }

    /// Every downloaded URL, in order.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }

    /// How many times form state was fetched.
    pub async fn form_state_fetches(&self) -> u32 {
        *self.form_state_fetches.read().await
    }
}

#[async_trait]
impl PortalGateway for MockPortal {
    async fn fetch_form_state(&self) -> Result<FormState, PortalError> {
        match *self.form_state_behavior.read().await {
            FormStateBehavior::Unavailable => {
                return Err(PortalError::Unavailable {
                    attempts: 5,
                    reason: "mock portal down".to_string(),
                });
            }
            FormStateBehavior::Malformed => {
                return Err(PortalError::MalformedPage {
                    reason: "mock markup change".to_string(),
                    snapshot: None,
                });
            }
            FormStateBehavior::Ok => {}
        }

        let mut fetches = self.form_state_fetches.write().await;
        *fetches += 1;

        Ok(FormState {
            csrf_token: format!("mock-token-{}", *fetches),
            captcha_image: self.captcha_image.clone(),
        })
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, PortalError> {
        self.submissions.write().await.push(payload.clone());

        let next = self.responses.write().await.pop_front();
        Ok(next.unwrap_or_else(|| fixtures::NO_RECORDS_PAGE.to_string()))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, PortalError> {
        if *self.fail_downloads.read().await {
            return Err(PortalError::BadStatus {
                status: reqwest::StatusCode::NOT_FOUND,
            });
        }
        self.downloads.write().await.push(url.to_string());
        Ok(self.document.read().await.clone())
    }
}
