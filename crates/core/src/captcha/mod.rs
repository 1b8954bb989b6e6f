//! CAPTCHA acquisition support: image preprocessing, OCR, and the
//! low-confidence fallback strategy.
//!
//! The portal's CAPTCHA font and noise profile are unknown and drift, so
//! recognition is tolerant and fails open to a fallback instead of silently
//! submitting garbage, which would waste a submission attempt.

mod error;
mod fallback;
mod ocr;
mod preprocess;
mod solver;
mod types;

pub use error::CaptchaError;
pub use fallback::{LowConfidenceHandler, PassthroughHandler, PromptHandler};
pub use ocr::{OcrEngine, TesseractOcr};
pub use preprocess::prepare_image;
pub use solver::CaptchaSolver;
pub use types::*;
