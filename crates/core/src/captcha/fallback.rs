//! Low-confidence fallback strategies.
//!
//! Interactive and unattended runs share one solver code path; the handler
//! injected here is the only thing that differs between them.

use async_trait::async_trait;
use tracing::warn;

use super::types::{CaptchaGuess, Confidence};

/// Decides what to do with a guess that failed the quality gate.
#[async_trait]
pub trait LowConfidenceHandler: Send + Sync {
    /// Returns the name of this handler implementation.
    fn name(&self) -> &str;

    /// Resolve a low-confidence guess into the guess that will be submitted.
    async fn resolve(&self, guess: CaptchaGuess) -> CaptchaGuess;
}

/// Submits the low-confidence guess unchanged. The unattended default: a
/// wrong guess only costs one attempt out of the date's budget.
#[derive(Debug, Default)]
pub struct PassthroughHandler;

#[async_trait]
impl LowConfidenceHandler for PassthroughHandler {
    fn name(&self) -> &str {
        "passthrough"
    }

    async fn resolve(&self, guess: CaptchaGuess) -> CaptchaGuess {
        guess
    }
}

/// Blocks for manual entry on stdin. The interactive default.
#[derive(Debug, Default)]
pub struct PromptHandler;

#[async_trait]
impl LowConfidenceHandler for PromptHandler {
    fn name(&self) -> &str {
        "prompt"
    }

    async fn resolve(&self, guess: CaptchaGuess) -> CaptchaGuess {
        eprintln!(
            "OCR produced a low-confidence guess ({:?}). Enter the CAPTCHA text manually:",
            guess.text
        );

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        match line {
            Ok(Ok(line)) => {
                let text: String = line
                    .trim()
                    .to_uppercase()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect();
                if text.is_empty() {
                    warn!("Empty manual entry, keeping the OCR guess");
                    guess
                } else {
                    CaptchaGuess::new(text, Confidence::Manual)
                }
            }
            _ => {
                warn!("Manual entry unavailable, keeping the OCR guess");
                guess
            }
        }
    }
}
