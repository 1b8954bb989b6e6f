//! Tesseract-based OCR engine implementation.

use async_trait::async_trait;
use image::GrayImage;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::config::OcrConfig;

use super::error::CaptchaError;

/// Best-effort image-to-text recognition.
///
/// Treated as non-deterministic: the same image may recognize differently
/// across engine versions, so callers gate the output rather than trust it.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Recognize text in a preprocessed grayscale image.
    async fn recognize(&self, image: &GrayImage) -> Result<String, CaptchaError>;
}

/// OCR engine that drives the `tesseract` binary over stdin/stdout.
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    /// Creates a new engine with the given configuration.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OcrConfig::default())
    }

    /// Builds the tesseract invocation: read from stdin, write to stdout,
    /// single-word segmentation, whitelist-restricted alphabet.
    fn build_args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.config.psm.to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", self.config.whitelist),
        ]
    }

    /// Encode the image as PNG for the engine's stdin.
    fn encode_png(image: &GrayImage) -> Result<Vec<u8>, CaptchaError> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(image.clone())
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .map_err(|e| CaptchaError::bad_image(format!("PNG encode failed: {}", e)))?;
        Ok(bytes)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &GrayImage) -> Result<String, CaptchaError> {
        let args = self.build_args();
        let png = Self::encode_png(image)?;

        debug!(
            bin = %self.config.tesseract_bin.display(),
            psm = self.config.psm,
            "Running OCR"
        );

        let mut child = Command::new(&self.config.tesseract_bin)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptchaError::EngineNotFound {
                        path: self.config.tesseract_bin.clone(),
                    }
                } else {
                    CaptchaError::Io(e)
                }
            })?;

        let mut stdin = child.stdin.take().expect("stdin should be captured");

        let timeout_secs = self.config.timeout_secs;
        let result = timeout(Duration::from_secs(timeout_secs), async {
            stdin.write_all(&png).await?;
            drop(stdin); // Close the pipe so tesseract starts processing.
            child.wait_with_output().await
        })
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CaptchaError::Io(e)),
            Err(_) => {
                return Err(CaptchaError::Timeout { timeout_secs });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(CaptchaError::engine_failed(
                format!("tesseract exited with code: {:?}", output.status.code()),
                if stderr.is_empty() {
                    None
                } else {
                    Some(stderr)
                },
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
