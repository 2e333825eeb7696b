pub mod encode;
pub mod error;
pub mod export;
pub mod icon;
pub mod loader;
pub mod pipeline;
pub mod quantize;
pub mod report;
pub mod resize;
pub mod scheduler;
pub mod session;

use image::Rgb;

pub use encode::{encode, encode_jpeg_bytes, measure_baseline, EncodedArtifact};
pub use error::PipelineError;
pub use export::{save_ico, save_jpeg, SaveReport};
pub use icon::{compose_icon, pad_to_square, CanvasFill, IconFrame, MultiResolutionIcon};
pub use loader::{load_image, LoadedImage};
pub use pipeline::{preview, preview_loaded, render_preview, Preview};
pub use quantize::{quantize, quantize_with_dithering, Dithering};
pub use report::{run_sweep, SizeSweep, SweepEntry};
pub use resize::{fit_within, resize_exact, thumbnail};
pub use scheduler::{Completion, PreviewScheduler, Ticket};
pub use session::{Session, SourceInfo};

/// Quality used to measure the "original size" baseline
pub const REFERENCE_QUALITY: u8 = 95;

pub const MIN_COLORS: u16 = 4;
pub const MAX_COLORS: u16 = 256;
pub const DEFAULT_COLORS: u16 = 32;

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;
pub const DEFAULT_QUALITY: u8 = 50;

/// Frame sizes written into exported icon files, in container order
pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 256];

/// Display footprint of the on-screen thumbnails (never persisted)
pub const PREVIEW_SIZE: (u32, u32) = (400, 400);

/// Background used when letterboxing a non-square image for icon export
pub const DEFAULT_CANVAS_FILL: CanvasFill = CanvasFill::Solid(Rgb([0, 0, 0]));

/// Palette size for quantization, always within [`MIN_COLORS`, `MAX_COLORS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorCount(u16);

impl ColorCount {
    /// Build a color count, clamping out-of-range values into the valid range
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_COLORS as u32, MAX_COLORS as u32) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for ColorCount {
    fn default() -> Self {
        Self(DEFAULT_COLORS)
    }
}

/// JPEG quality, always within [`MIN_QUALITY`, `MAX_QUALITY`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const REFERENCE: Quality = Quality(REFERENCE_QUALITY);

    /// Build a quality level, clamping out-of-range values into the valid range
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_QUALITY as u32, MAX_QUALITY as u32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// The live parameters a preview is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewParams {
    pub colors: ColorCount,
    pub quality: Quality,
    pub dithering: Dithering,
}

impl PreviewParams {
    pub fn new(colors: u32, quality: u32) -> Self {
        Self {
            colors: ColorCount::new(colors),
            quality: Quality::new(quality),
            dithering: Dithering::None,
        }
    }

    pub fn with_dithering(mut self, dithering: Dithering) -> Self {
        self.dithering = dithering;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_count_clamps() {
        assert_eq!(ColorCount::new(0).get(), MIN_COLORS);
        assert_eq!(ColorCount::new(3).get(), 4);
        assert_eq!(ColorCount::new(16).get(), 16);
        assert_eq!(ColorCount::new(256).get(), 256);
        assert_eq!(ColorCount::new(100_000).get(), MAX_COLORS);
    }

    #[test]
    fn test_quality_clamps() {
        assert_eq!(Quality::new(0).get(), MIN_QUALITY);
        assert_eq!(Quality::new(1).get(), 1);
        assert_eq!(Quality::new(100).get(), 100);
        assert_eq!(Quality::new(101).get(), MAX_QUALITY);
        assert_eq!(Quality::REFERENCE.get(), 95);
    }

    #[test]
    fn test_default_params() {
        let params = PreviewParams::default();
        assert_eq!(params.colors.get(), DEFAULT_COLORS);
        assert_eq!(params.quality.get(), DEFAULT_QUALITY);
        assert_eq!(params.dithering, Dithering::None);
    }
}
