use image::{ImageBuffer, Rgb, RgbImage};
use lossy_compressor::image_processing::{
    compose_icon, encode, measure_baseline, pad_to_square, preview, quantize, CanvasFill,
    ColorCount, PreviewParams, Quality, ICON_SIZES,
};

fn hash(x: u32, y: u32, salt: u32) -> u32 {
    let h = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(salt.wrapping_mul(2246822519));
    let h = (h ^ (h >> 13)).wrapping_mul(1274126177);
    h ^ (h >> 16)
}

/// Broad color gradients under per-channel grain, loosely resembling a photograph
///
/// The grain (up to ±32 per channel) is stronger than the gap between
/// neighbouring palette entries, so a larger palette keeps more of it.
fn photo_like(width: u32, height: u32, seed: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let wave = ((fx * 6.0 + seed as f32).sin() * (fy * 4.0).cos() + 1.0) * 0.5;
        let grain = |channel: u32| (hash(x, y, seed * 3 + channel) % 65) as f32 - 32.0;

        let r = 40.0 + 170.0 * fx + grain(0);
        let g = 30.0 + 190.0 * wave + grain(1);
        let b = 210.0 - 160.0 * fy + grain(2);
        Rgb([
            r.clamp(0.0, 255.0) as u8,
            g.clamp(0.0, 255.0) as u8,
            b.clamp(0.0, 255.0) as u8,
        ])
    })
}

fn corpus() -> Vec<RgbImage> {
    vec![
        photo_like(160, 120, 1),
        photo_like(120, 160, 2),
        photo_like(200, 100, 3),
    ]
}

fn encoded_size(img: &RgbImage, quality: u32) -> usize {
    encode(img, Quality::new(quality)).unwrap().1.len()
}

#[test]
fn fewer_colors_encode_smaller_on_average() {
    let ladder = [4, 8, 16, 32, 64, 128, 256];
    let images = corpus();

    for quality in [30, 75] {
        let totals: Vec<(u32, usize)> = ladder
            .iter()
            .map(|&colors| {
                let total = images
                    .iter()
                    .map(|img| encoded_size(&quantize(img, ColorCount::new(colors)), quality))
                    .sum();
                (colors, total)
            })
            .collect();

        for pair in totals.windows(2) {
            assert!(
                pair[0].1 <= pair[1].1,
                "quality {}: sizes by color count {:?}",
                quality,
                totals
            );
        }
    }
}

#[test]
fn lower_quality_encodes_smaller_on_average() {
    let mut totals = [0usize; 3];
    for img in corpus() {
        let quantized = quantize(&img, ColorCount::new(32));
        for (total, quality) in totals.iter_mut().zip([10, 50, 90]) {
            *total += encoded_size(&quantized, quality);
        }
    }

    assert!(totals[0] <= totals[1], "{:?}", totals);
    assert!(totals[1] <= totals[2], "{:?}", totals);
}

#[test]
fn encode_round_trip_is_decodable() {
    for quality in [1, 50, 100] {
        let img = photo_like(33, 17, quality);
        let (decoded, artifact) = encode(&img, Quality::new(quality)).unwrap();

        assert_eq!(decoded.dimensions(), (33, 17));
        assert!(artifact.len() > 0);
        assert_eq!(artifact.len(), artifact.bytes().len());
    }
}

#[test]
fn icon_has_one_square_frame_per_target() {
    let img = photo_like(300, 180, 4);
    let icon = compose_icon(&img, &ICON_SIZES, CanvasFill::default()).unwrap();

    assert_eq!(icon.len(), 4);
    for (frame, &size) in icon.frames().iter().zip(ICON_SIZES.iter()) {
        assert_eq!(frame.size, size);
        assert_eq!(frame.image.dimensions(), (size, size));
    }
}

#[test]
fn wide_source_is_centered_vertically() {
    let img = RgbImage::from_pixel(100, 50, Rgb([200, 200, 200]));
    let padded = pad_to_square(&img, CanvasFill::default());

    assert_eq!(padded.dimensions(), (100, 100));
    for x in [0, 50, 99] {
        assert_eq!(*padded.get_pixel(x, 24), Rgb([0, 0, 0]));
        assert_eq!(*padded.get_pixel(x, 25), Rgb([200, 200, 200]));
        assert_eq!(*padded.get_pixel(x, 74), Rgb([200, 200, 200]));
        assert_eq!(*padded.get_pixel(x, 75), Rgb([0, 0, 0]));
    }
}

#[test]
fn identical_inputs_give_identical_sizes() {
    let img = photo_like(90, 70, 5);
    let params = PreviewParams::new(24, 60);

    let first = preview(&img, &params).unwrap();
    let second = preview(&img, &params).unwrap();

    assert_eq!(first.compressed_bytes, second.compressed_bytes);
    assert_eq!(first.original_bytes, second.original_bytes);
    assert_eq!(first.image, second.image);
}

#[test]
fn baseline_ignores_parameters() {
    let img = photo_like(80, 80, 6);
    let baseline = measure_baseline(&img).unwrap();

    for (colors, quality) in [(4, 1), (32, 50), (256, 100)] {
        let result = preview(&img, &PreviewParams::new(colors, quality)).unwrap();
        assert_eq!(result.original_bytes, baseline);
    }
}

#[test]
fn end_to_end_compresses_photo_like_image() {
    let img = photo_like(200, 100, 7);
    let result = preview(&img, &PreviewParams::new(16, 30)).unwrap();

    assert_eq!(result.image.dimensions(), (200, 100));
    assert_eq!(result.original_bytes, measure_baseline(&img).unwrap());
    assert!(
        result.compressed_bytes < result.original_bytes,
        "{} >= {}",
        result.compressed_bytes,
        result.original_bytes
    );
}
