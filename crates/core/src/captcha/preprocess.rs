//! CAPTCHA image preprocessing.
//!
//! Pipeline: grayscale, linear upscale, inverted binary threshold, 3x3
//! median denoise. The threshold and upscale factor are tunable because the
//! portal regenerates its CAPTCHA style from time to time.

use image::imageops::FilterType;
use image::GrayImage;

use crate::config::OcrConfig;

use super::error::CaptchaError;

/// Decode raw CAPTCHA bytes and run the full preprocessing pipeline.
pub fn prepare_image(bytes: &[u8], config: &OcrConfig) -> Result<GrayImage, CaptchaError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CaptchaError::bad_image(e.to_string()))?;
    let gray = decoded.into_luma8();

    let upscaled = if config.upscale > 1 {
        image::imageops::resize(
            &gray,
            gray.width() * config.upscale,
            gray.height() * config.upscale,
            FilterType::Triangle,
        )
    } else {
        gray
    };

    let binary = threshold_inverted(&upscaled, config.threshold);
    Ok(median_denoise(&binary))
}

/// Inverted binary threshold: dark glyph pixels become white, background
/// becomes black, which is the polarity the recognizer handles best here.
pub(super) fn threshold_inverted(img: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = if pixel.0[0] < threshold { 255 } else { 0 };
    }
    out
}

/// 3x3 median filter with replicated borders. Knocks out the portal's
/// salt-and-pepper speckling without eroding glyph strokes.
pub(super) fn median_denoise(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut window = [0u8; 9];
            let mut i = 0;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                    let ny = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                    window[i] = img.get_pixel(nx, ny).0[0];
                    i += 1;
                }
            }
            window.sort_unstable();
            out.put_pixel(x, y, image::Luma([window[4]]));
        }
    }

    out
}
