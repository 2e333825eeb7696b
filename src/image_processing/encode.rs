use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use super::{PipelineError, Quality};

/// Byte-exact output of a lossy encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    bytes: Vec<u8>,
}

impl EncodedArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Exact length of the encoded buffer
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode an image as JPEG into memory
pub fn encode_jpeg_bytes(img: &RgbImage, quality: Quality) -> Result<EncodedArtifact, PipelineError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.get());
        encoder.encode_image(img).map_err(PipelineError::Encode)?;
    }
    Ok(EncodedArtifact { bytes })
}

/// Run an image through the JPEG codec and back
///
/// The returned image is decoded from the very bytes that were measured, so
/// the preview shows exactly what a saved file would contain, codec artifacts
/// included.
pub fn encode(img: &RgbImage, quality: Quality) -> Result<(RgbImage, EncodedArtifact), PipelineError> {
    let artifact = encode_jpeg_bytes(img, quality)?;
    let decoded = image::load_from_memory_with_format(artifact.bytes(), ImageFormat::Jpeg)
        .map_err(PipelineError::Decode)?
        .to_rgb8();

    log::debug!(
        "Encoded {}x{} at quality {}: {} bytes",
        img.width(),
        img.height(),
        quality.get(),
        artifact.len()
    );

    Ok((decoded, artifact))
}

/// Size of the image encoded at the fixed reference quality
///
/// Stands in for the "original size": the on-disk length of the loaded file
/// is not what the pipeline works from, a reproducible re-encode is.
pub fn measure_baseline(img: &RgbImage) -> Result<usize, PipelineError> {
    Ok(encode_jpeg_bytes(img, Quality::REFERENCE)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            let noise = ((x.wrapping_mul(7919) ^ y.wrapping_mul(104729)) % 31) as u8;
            Rgb([
                ((x * 3) % 256) as u8 ^ noise,
                ((y * 5) % 256) as u8,
                ((x + y) % 256) as u8 ^ (noise / 2),
            ])
        })
    }

    #[test]
    fn test_encode_round_trip() {
        let img = create_test_image(64, 48);
        let (decoded, artifact) = encode(&img, Quality::new(50)).unwrap();

        assert_eq!(decoded.dimensions(), (64, 48));
        assert!(!artifact.is_empty());
        // JPEG SOI marker
        assert_eq!(&artifact.bytes()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_artifact_length_is_exact() {
        let img = create_test_image(32, 32);
        let artifact = encode_jpeg_bytes(&img, Quality::new(70)).unwrap();
        let length = artifact.len();
        assert_eq!(artifact.into_bytes().len(), length);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let img = create_test_image(40, 40);
        let (first_img, first) = encode(&img, Quality::new(30)).unwrap();
        let (second_img, second) = encode(&img, Quality::new(30)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_img, second_img);
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = create_test_image(96, 96);
        let low = encode_jpeg_bytes(&img, Quality::new(10)).unwrap().len();
        let high = encode_jpeg_bytes(&img, Quality::new(90)).unwrap().len();
        assert!(low < high, "q10 = {} bytes, q90 = {} bytes", low, high);
    }

    #[test]
    fn test_baseline_uses_reference_quality() {
        let img = create_test_image(50, 30);
        let baseline = measure_baseline(&img).unwrap();
        let direct = encode_jpeg_bytes(&img, Quality::new(95)).unwrap().len();
        assert_eq!(baseline, direct);
    }
}
