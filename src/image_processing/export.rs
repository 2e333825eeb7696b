use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use super::encode::encode_jpeg_bytes;
use super::icon::{compose_icon, CanvasFill};
use super::{PipelineError, Quality, ICON_SIZES};

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub bytes: usize,
}

impl SaveReport {
    /// File name for status messages, falling back to the full path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Encode `image` as a single-frame JPEG at `quality` and write it to `path`
pub fn save_jpeg(image: &RgbImage, quality: Quality, path: &Path) -> Result<SaveReport, PipelineError> {
    let artifact = encode_jpeg_bytes(image, quality)?;
    write_file(path, artifact.bytes())
}

/// Compose an ICO with every size in [`ICON_SIZES`] and write it to `path`
pub fn save_ico(image: &RgbImage, fill: CanvasFill, path: &Path) -> Result<SaveReport, PipelineError> {
    let icon = compose_icon(image, &ICON_SIZES, fill)?;
    let bytes = icon.to_ico_bytes()?;
    write_file(path, &bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<SaveReport, PipelineError> {
    fs::write(path, bytes).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());

    Ok(SaveReport {
        path: path.to_path_buf(),
        bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 2) as u8, (y * 3) as u8, 90]))
    }

    #[test]
    fn test_save_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let img = create_test_image(60, 40);

        let report = save_jpeg(&img, Quality::new(40), &path).unwrap();
        assert_eq!(report.bytes as u64, fs::metadata(&path).unwrap().len());
        assert_eq!(report.file_name(), "out.jpg");

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (60, 40));
    }

    #[test]
    fn test_save_ico() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ico");
        let img = create_test_image(90, 30);

        let report = save_ico(&img, CanvasFill::default(), &path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(report.bytes, bytes.len());

        let icon_dir = ico::IconDir::read(Cursor::new(bytes)).unwrap();
        let sizes: Vec<u32> = icon_dir.entries().iter().map(|e| e.width()).collect();
        assert_eq!(sizes, ICON_SIZES.to_vec());
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jpg");
        let result = save_jpeg(&create_test_image(8, 8), Quality::default(), &path);
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }
}
