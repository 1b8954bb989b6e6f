use serde::{Deserialize, Serialize};

/// How much trust a CAPTCHA guess deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// OCR output that passed the quality gate.
    OcrHigh,
    /// OCR output that failed the quality gate; the fallback policy decides
    /// whether it is still submitted.
    OcrLow,
    /// Text entered by a human.
    Manual,
}

/// A best-guess reading of a CAPTCHA image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaGuess {
    /// Normalized candidate text: uppercase, alphanumerics only.
    pub text: String,
    pub confidence: Confidence,
}

impl CaptchaGuess {
    pub fn new(text: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// Whether the guess is trustworthy enough to submit without a second
    /// opinion.
    pub fn is_reliable(&self) -> bool {
        matches!(self.confidence, Confidence::OcrHigh | Confidence::Manual)
    }
}
