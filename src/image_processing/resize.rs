use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

use super::{PipelineError, PREVIEW_SIZE};

/// Resize an image to exact dimensions using Lanczos3 convolution
pub fn resize_exact(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage, PipelineError> {
    let (src_width, src_height) = img.dimensions();

    if src_width == 0 || src_height == 0 {
        return Err(PipelineError::Resize(format!(
            "Source image is empty ({}x{})",
            src_width, src_height
        )));
    }
    if width == 0 || height == 0 {
        return Err(PipelineError::Resize(format!(
            "Target size must be non-zero, got {}x{}",
            width, height
        )));
    }

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| PipelineError::Resize(e.to_string()))?;

    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PipelineError::Resize(e.to_string()))?;

    RgbImage::from_raw(width, height, dst_image.buffer().to_vec()).ok_or_else(|| {
        PipelineError::Resize(format!(
            "Resized buffer does not match {}x{} RGB layout",
            width, height
        ))
    })
}

/// Scale an image down to fit inside `max_width` x `max_height`, keeping aspect
///
/// Images already inside the box are returned as-is.
pub fn fit_within(img: &RgbImage, max_width: u32, max_height: u32) -> Result<RgbImage, PipelineError> {
    let (width, height) = img.dimensions();
    if width <= max_width && height <= max_height {
        return Ok(img.clone());
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);

    resize_exact(img, new_width, new_height)
}

/// Display thumbnail sized for the preview panes
pub fn thumbnail(img: &RgbImage) -> Result<RgbImage, PipelineError> {
    fit_within(img, PREVIEW_SIZE.0, PREVIEW_SIZE.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_resize_exact() {
        let img = create_test_image(100, 100);
        let resized = resize_exact(&img, 50, 50).unwrap();
        assert_eq!(resized.dimensions(), (50, 50));

        let upscaled = resize_exact(&img, 256, 256).unwrap();
        assert_eq!(upscaled.dimensions(), (256, 256));
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let img = create_test_image(20, 10);
        assert_eq!(resize_exact(&img, 20, 10).unwrap(), img);
    }

    #[test]
    fn test_resize_flat_color_stays_flat() {
        let img = RgbImage::from_pixel(64, 64, Rgb([40, 120, 200]));
        let resized = resize_exact(&img, 16, 16).unwrap();
        for pixel in resized.pixels() {
            for channel in 0..3 {
                let diff = pixel[channel] as i32 - img.get_pixel(0, 0)[channel] as i32;
                assert!(diff.abs() <= 1);
            }
        }
    }

    #[test]
    fn test_resize_rejects_zero_sizes() {
        let img = create_test_image(10, 10);
        assert!(resize_exact(&img, 0, 10).is_err());
        assert!(resize_exact(&RgbImage::new(0, 0), 10, 10).is_err());
    }

    #[test]
    fn test_thumbnail_keeps_aspect() {
        let img = create_test_image(800, 200);
        let thumb = thumbnail(&img).unwrap();
        assert_eq!(thumb.dimensions(), (400, 100));

        let small = create_test_image(120, 90);
        assert_eq!(thumbnail(&small).unwrap().dimensions(), (120, 90));
    }
}
