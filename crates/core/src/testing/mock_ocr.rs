//! Mock OCR engine for testing.

use async_trait::async_trait;
use image::GrayImage;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::captcha::{CaptchaError, OcrEngine};

/// What the mock should do on the next recognition.
#[derive(Debug, Clone)]
enum Behavior {
    Return(String),
    Fail(String),
}

/// Mock implementation of the OcrEngine trait.
///
/// Returns a scripted string (or error) and counts recognitions so tests
/// can assert how often the pipeline ran.
pub struct MockOcr {
    behavior: Behavior,
    recognitions: Arc<RwLock<u32>>,
}

impl MockOcr {
    /// Engine that always recognizes the given text.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Return(text.into()),
            recognitions: Arc::new(RwLock::new(0)),
        }
    }

    /// Engine that always fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(reason.into()),
            recognitions: Arc::new(RwLock::new(0)),
        }
    }

    /// How many times `recognize` was called.
    pub async fn recognitions(&self) -> u32 {
        *self.recognitions.read().await
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, _image: &GrayImage) -> Result<String, CaptchaError> {
        *self.recognitions.write().await += 1;
        match &self.behavior {
            Behavior::Return(text) => Ok(text.clone()),
            Behavior::Fail(reason) => Err(CaptchaError::engine_failed(reason.clone(), None)),
        }
    }
}
