//! Multi-resolution icon composition
//!
//! A (possibly non-square) image is letterboxed onto a square canvas, the
//! canvas is resampled once per target size, and the frames are packaged in
//! target order into a single ICO container.
use image::{DynamicImage, Rgb, RgbImage};
use std::io;
use std::str::FromStr;

use super::resize::resize_exact;
use super::{PipelineError, DEFAULT_CANVAS_FILL};

/// Largest frame dimension an ICO directory entry can describe
pub const MAX_ICO_DIMENSION: u32 = 256;

/// How the area around a letterboxed image is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasFill {
    /// A single solid color
    Solid(Rgb<u8>),
    /// Repeat the nearest edge pixel of the source outwards
    EdgeExtend,
}

impl Default for CanvasFill {
    fn default() -> Self {
        DEFAULT_CANVAS_FILL
    }
}

impl FromStr for CanvasFill {
    type Err = String;

    /// Accepts `edge` or a hex color such as `#000000` / `#fff`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("edge") {
            return Ok(CanvasFill::EdgeExtend);
        }
        crate::utils::parse_hex_color(value)
            .map(CanvasFill::Solid)
            .ok_or_else(|| {
                format!(
                    "Invalid fill '{}'. Use 'edge' or a hex color like #000000",
                    value
                )
            })
    }
}

/// One resampled frame of an icon
#[derive(Debug, Clone)]
pub struct IconFrame {
    pub size: u32,
    pub image: RgbImage,
}

/// Frames derived from the same square-padded source, in target order
#[derive(Debug, Clone, Default)]
pub struct MultiResolutionIcon {
    frames: Vec<IconFrame>,
}

impl MultiResolutionIcon {
    pub fn frames(&self) -> &[IconFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn sizes(&self) -> Vec<u32> {
        self.frames.iter().map(|frame| frame.size).collect()
    }

    /// Serialize all frames into an ICO container
    pub fn to_ico_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);

        for frame in &self.frames {
            if frame.size == 0 || frame.size > MAX_ICO_DIMENSION {
                return Err(PipelineError::IconPackaging(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "ICO frames must be between 1 and {} pixels, got {}",
                        MAX_ICO_DIMENSION, frame.size
                    ),
                )));
            }

            let rgba = DynamicImage::ImageRgb8(frame.image.clone()).into_rgba8();
            let icon_image = ico::IconImage::from_rgba_data(frame.size, frame.size, rgba.into_raw());
            let entry = ico::IconDirEntry::encode(&icon_image).map_err(PipelineError::IconPackaging)?;
            icon_dir.add_entry(entry);
        }

        let mut bytes = Vec::new();
        icon_dir
            .write(&mut bytes)
            .map_err(PipelineError::IconPackaging)?;
        Ok(bytes)
    }
}

/// Center an image on a square canvas of side `max(width, height)`
///
/// The paste offset is `((size - width) / 2, (size - height) / 2)`, rounded
/// down.
pub fn pad_to_square(img: &RgbImage, fill: CanvasFill) -> RgbImage {
    let (width, height) = img.dimensions();
    let size = width.max(height);

    if width == 0 || height == 0 {
        return RgbImage::new(size, size);
    }
    if width == height {
        return img.clone();
    }

    let offset_x = (size - width) / 2;
    let offset_y = (size - height) / 2;

    let mut canvas = match fill {
        CanvasFill::Solid(color) => RgbImage::from_pixel(size, size, color),
        CanvasFill::EdgeExtend => RgbImage::from_fn(size, size, |x, y| {
            let src_x = x.saturating_sub(offset_x).min(width - 1);
            let src_y = y.saturating_sub(offset_y).min(height - 1);
            *img.get_pixel(src_x, src_y)
        }),
    };

    image::imageops::replace(&mut canvas, img, offset_x as i64, offset_y as i64);
    canvas
}

/// Letterbox, resample to every target size and collect the frames
///
/// An empty `targets` slice yields an empty icon.
pub fn compose_icon(
    source: &RgbImage,
    targets: &[u32],
    fill: CanvasFill,
) -> Result<MultiResolutionIcon, PipelineError> {
    let canvas = pad_to_square(source, fill);

    let frames = targets
        .iter()
        .map(|&size| {
            resize_exact(&canvas, size, size).map(|image| IconFrame { size, image })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "Composed icon from {}x{} source ({}x{} canvas): sizes {:?}",
        source.width(),
        source.height(),
        canvas.width(),
        canvas.height(),
        targets
    );

    Ok(MultiResolutionIcon { frames })
}
