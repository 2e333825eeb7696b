//! Adaptive palette quantization
//!
//! Trains a palette of at most `colors` entries on the image's own pixels
//! (NeuQuant neural quantizer), maps every pixel to its
//! nearest palette entry and hands back a plain RGB image. The result only
//! *looks* palettized; downstream stages keep working on three-channel pixels.
use color_quant::NeuQuant;
use image::{Rgb, RgbImage};
use rayon::prelude::*;
use std::collections::HashMap;

use super::ColorCount;

/// How pixels are mapped onto the adaptive palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dithering {
    /// Plain nearest-color mapping (posterized bands)
    #[default]
    None,
    /// Floyd-Steinberg error diffusion against the adaptive palette
    FloydSteinberg,
}

/// Reduce an image to at most `colors` distinct colors
pub fn quantize(img: &RgbImage, colors: ColorCount) -> RgbImage {
    quantize_with_dithering(img, colors, Dithering::None)
}

/// Reduce an image to at most `colors` distinct colors using the given mapping
pub fn quantize_with_dithering(img: &RgbImage, colors: ColorCount, dithering: Dithering) -> RgbImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        log::warn!("Skipping quantization of empty {}x{} image", width, height);
        return img.clone();
    }

    let distinct = distinct_colors(img);
    if distinct.len() <= colors.get() as usize {
        log::debug!(
            "Image already has {} colors (limit {}), keeping it unchanged",
            distinct.len(),
            colors.get()
        );
        return img.clone();
    }

    let palette = build_palette(img, colors.get() as usize);

    log::debug!(
        "Quantizing {}x{} image: {} distinct colors -> {} palette entries",
        width,
        height,
        distinct.len(),
        palette.len()
    );

    match dithering {
        Dithering::None => remap_to_palette(img, &distinct, &palette),
        Dithering::FloydSteinberg => apply_floyd_steinberg_dithering(img, &palette),
    }
}

/// Every color used by the image, sorted
fn distinct_colors(img: &RgbImage) -> Vec<[u8; 3]> {
    let mut colors: Vec<[u8; 3]> = img.pixels().map(|p| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors
}

/// NeuQuant sampling factor: 1 examines every pixel, 30 is the fastest
fn sample_factor(pixel_count: usize) -> i32 {
    if pixel_count > 1_000_000 {
        10
    } else if pixel_count > 100_000 {
        5
    } else {
        1
    }
}

/// Adaptive palette of at most `max_colors` entries, trained with NeuQuant
fn build_palette(img: &RgbImage, max_colors: usize) -> Vec<[u8; 3]> {
    let rgba: Vec<u8> = img
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
        .collect();
    let pixel_count = rgba.len() / 4;

    let nq = NeuQuant::new(sample_factor(pixel_count), max_colors, &rgba);

    // Untrained neurons can collapse onto the same color
    let mut palette: Vec<[u8; 3]> = nq
        .color_map_rgb()
        .chunks_exact(3)
        .map(|chunk| [chunk[0], chunk[1], chunk[2]])
        .collect();
    palette.sort_unstable();
    palette.dedup();
    palette
}

fn color_distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Find the closest palette color (squared Euclidean distance in RGB space)
fn find_closest_color(color: [u8; 3], palette: &[[u8; 3]]) -> [u8; 3] {
    let mut closest = palette[0];
    let mut min_distance = u32::MAX;

    for &candidate in palette {
        let distance = color_distance_sq(color, candidate);
        if distance < min_distance {
            min_distance = distance;
            closest = candidate;
        }
    }

    closest
}

/// Map every pixel onto its nearest palette entry
///
/// The lookup is built once per distinct color, in parallel.
fn remap_to_palette(img: &RgbImage, distinct: &[[u8; 3]], palette: &[[u8; 3]]) -> RgbImage {
    let lookup: HashMap<[u8; 3], [u8; 3]> = distinct
        .par_iter()
        .map(|&color| (color, find_closest_color(color, palette)))
        .collect();

    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        if let Some(mapped) = lookup.get(&pixel.0) {
            pixel.0 = *mapped;
        }
    }
    output
}

/// Floyd-Steinberg error diffusion against an arbitrary palette
///
/// Error distribution:
/// ```text
///          *   7/16
///   3/16  5/16 1/16
/// ```
fn apply_floyd_steinberg_dithering(img: &RgbImage, palette: &[[u8; 3]]) -> RgbImage {
    let (width, height) = img.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut output = RgbImage::new(width, height);

    let mut working: Vec<[f32; 3]> = img
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();

    for y in 0..h {
        for x in 0..w {
            let current = working[y * w + x];
            let clamped = [
                current[0].clamp(0.0, 255.0).round() as u8,
                current[1].clamp(0.0, 255.0).round() as u8,
                current[2].clamp(0.0, 255.0).round() as u8,
            ];
            let chosen = find_closest_color(clamped, palette);
            output.put_pixel(x as u32, y as u32, Rgb(chosen));

            let error = [
                current[0] - chosen[0] as f32,
                current[1] - chosen[1] as f32,
                current[2] - chosen[2] as f32,
            ];

            let mut diffuse = |nx: usize, ny: usize, weight: f32| {
                let cell = &mut working[ny * w + nx];
                for channel in 0..3 {
                    cell[channel] += error[channel] * weight;
                }
            };

            if x + 1 < w {
                diffuse(x + 1, y, 7.0 / 16.0);
            }
            if y + 1 < h {
                if x > 0 {
                    diffuse(x - 1, y + 1, 3.0 / 16.0);
                }
                diffuse(x, y + 1, 5.0 / 16.0);
                if x + 1 < w {
                    diffuse(x + 1, y + 1, 1.0 / 16.0);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;
    use std::collections::HashSet;

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) % 256) as u8,
            ])
        })
    }

    fn distinct_colors(img: &RgbImage) -> usize {
        img.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
    }

    #[test]
    fn test_quantize_respects_color_bound() {
        let img = create_test_image(120, 80);
        assert!(distinct_colors(&img) > 256);

        for colors in [4, 16, 64, 256] {
            let quantized = quantize(&img, ColorCount::new(colors));
            assert_eq!(quantized.dimensions(), img.dimensions());
            assert!(
                distinct_colors(&quantized) <= colors as usize,
                "{} colors requested, {} produced",
                colors,
                distinct_colors(&quantized)
            );
        }
    }

    #[test]
    fn test_quantize_keeps_small_palettes_exact() {
        let img = ImageBuffer::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgb([200, 10, 10])
            } else {
                Rgb([10, 10, 200])
            }
        });

        let quantized = quantize(&img, ColorCount::new(4));
        assert_eq!(quantized, img);
    }

    #[test]
    fn test_quantize_is_deterministic() {
        let img = create_test_image(64, 64);
        let first = quantize(&img, ColorCount::new(8));
        let second = quantize(&img, ColorCount::new(8));
        assert_eq!(first, second);
    }

    #[test]
    fn test_quantize_empty_image() {
        let img = RgbImage::new(0, 0);
        let quantized = quantize(&img, ColorCount::new(16));
        assert_eq!(quantized.dimensions(), (0, 0));
    }

    #[test]
    fn test_palette_finds_clusters() {
        // Two tight clusters, one dark red and one light blue
        let img = ImageBuffer::from_fn(40, 20, |x, y| {
            let jitter = ((x + y) % 3) as u8;
            if x < 20 {
                Rgb([180 + jitter, 20 + jitter, 20])
            } else {
                Rgb([20, 20 + jitter, 220 + jitter])
            }
        });

        let palette = build_palette(&img, 4);
        assert!(!palette.is_empty() && palette.len() <= 4);

        let has_red = palette.iter().any(|c| c[0] > 150 && c[2] < 60);
        let has_blue = palette.iter().any(|c| c[2] > 180 && c[0] < 60);
        assert!(has_red && has_blue, "unexpected palette {:?}", palette);
    }

    #[test]
    fn test_find_closest_color() {
        let palette = [[0, 0, 0], [255, 255, 255], [255, 0, 0]];
        assert_eq!(find_closest_color([10, 10, 10], &palette), [0, 0, 0]);
        assert_eq!(find_closest_color([240, 250, 230], &palette), [255, 255, 255]);
        assert_eq!(find_closest_color([200, 30, 20], &palette), [255, 0, 0]);
    }

    #[test]
    fn test_floyd_steinberg_uses_palette_only() {
        let img = create_test_image(48, 32);
        let quantized = quantize_with_dithering(&img, ColorCount::new(8), Dithering::FloydSteinberg);

        let palette: HashSet<[u8; 3]> = build_palette(&img, 8).into_iter().collect();
        assert!(quantized.pixels().all(|p| palette.contains(&p.0)));
    }
}
