use regex_lite::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::config::OcrConfig;

use super::error::CaptchaError;
use super::fallback::LowConfidenceHandler;
use super::ocr::OcrEngine;
use super::preprocess::prepare_image;
use super::types::{CaptchaGuess, Confidence};

/// Minimum candidate length the quality gate accepts; the portal's CAPTCHAs
/// are never shorter.
const MIN_CANDIDATE_LEN: usize = 4;

/// Turns a raw CAPTCHA image into a guess the orchestrator can submit.
pub struct CaptchaSolver {
    engine: Arc<dyn OcrEngine>,
    fallback: Arc<dyn LowConfidenceHandler>,
    config: OcrConfig,
}

impl CaptchaSolver {
    /// Create a solver from an engine and a low-confidence fallback policy.
    pub fn new(
        engine: Arc<dyn OcrEngine>,
        fallback: Arc<dyn LowConfidenceHandler>,
        config: OcrConfig,
    ) -> Self {
        Self {
            engine,
            fallback,
            config,
        }
    }

    /// Preprocess, recognize, normalize and quality-gate one image.
    ///
    /// A candidate that fails the gate is routed through the fallback
    /// handler before it is returned; the caller always receives the guess
    /// that should actually be submitted.
    pub async fn solve(&self, image: &[u8]) -> Result<CaptchaGuess, CaptchaError> {
        let prepared = prepare_image(image, &self.config)?;
        let raw = self.engine.recognize(&prepared).await?;
        let text = normalize_candidate(&raw);

        debug!(engine = self.engine.name(), raw = %raw, candidate = %text, "OCR candidate");

        if passes_quality_gate(&text) {
            return Ok(CaptchaGuess::new(text, Confidence::OcrHigh));
        }

        debug!(
            candidate = %text,
            handler = self.fallback.name(),
            "Candidate failed quality gate, applying fallback"
        );
        Ok(self
            .fallback
            .resolve(CaptchaGuess::new(text, Confidence::OcrLow))
            .await)
    }
}

/// Uppercase and strip everything outside the alphanumeric whitelist.
fn normalize_candidate(raw: &str) -> String {
    let stripper = Regex::new(r"[^0-9A-Z]+").expect("normalization regex is valid");
    stripper.replace_all(&raw.to_uppercase(), "").to_string()
}

/// A candidate is trustworthy only if it is long enough and fully
/// alphanumeric.
fn passes_quality_gate(candidate: &str) -> bool {
    candidate.len() >= MIN_CANDIDATE_LEN
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}
