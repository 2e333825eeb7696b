//! Preview pipeline: quantize, then round-trip through the lossy codec
//!
//! Pure functions of their inputs. Nothing is cached here; a front-end that
//! wants to reuse the baseline across parameter changes keeps it in a
//! [`Session`](super::Session) and calls [`render_preview`] directly.
use image::RgbImage;
use std::time::Instant;

use super::encode::{encode, measure_baseline};
use super::quantize::quantize_with_dithering;
use super::{PipelineError, PreviewParams};
use crate::utils::format_size_status;

/// Result of one preview computation
#[derive(Debug, Clone)]
pub struct Preview {
    /// Decoded from the encoded bytes, codec artifacts included
    pub image: RgbImage,
    /// Baseline size of the original at the reference quality
    pub original_bytes: usize,
    /// Exact size of the encoded preview
    pub compressed_bytes: usize,
    pub params: PreviewParams,
}

impl Preview {
    pub fn status_line(&self) -> String {
        format_size_status(self.original_bytes, self.compressed_bytes)
    }

    /// Compressed size relative to the baseline, in percent
    pub fn ratio_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.original_bytes as f64 * 100.0
        }
    }
}

/// Compute the preview and both byte sizes for `original`
pub fn preview(original: &RgbImage, params: &PreviewParams) -> Result<Preview, PipelineError> {
    let original_bytes = measure_baseline(original)?;
    render_preview(original, params, original_bytes)
}

/// Same as [`preview`], but a missing original is a silent no-op
pub fn preview_loaded(
    original: Option<&RgbImage>,
    params: &PreviewParams,
) -> Result<Option<Preview>, PipelineError> {
    match original {
        Some(original) => preview(original, params).map(Some),
        None => Ok(None),
    }
}

/// Quantize and encode with an already measured baseline
pub fn render_preview(
    original: &RgbImage,
    params: &PreviewParams,
    original_bytes: usize,
) -> Result<Preview, PipelineError> {
    let start_time = Instant::now();

    let quantized = quantize_with_dithering(original, params.colors, params.dithering);
    let (image, artifact) = encode(&quantized, params.quality)?;

    log::debug!(
        "Preview {} colors / quality {}: {} -> {} bytes in {:?}",
        params.colors.get(),
        params.quality.get(),
        original_bytes,
        artifact.len(),
        start_time.elapsed()
    );

    Ok(Preview {
        image,
        original_bytes,
        compressed_bytes: artifact.len(),
        params: *params,
    })
}
