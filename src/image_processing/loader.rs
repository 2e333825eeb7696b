use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use super::PipelineError;
use crate::utils::has_valid_extension;

/// Input formats accepted by the loader
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// A decoded input image together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: RgbImage,
    pub path: PathBuf,
    /// Length of the file on disk
    pub file_bytes: u64,
}

pub fn is_supported(path: &Path) -> bool {
    has_valid_extension(path, SUPPORTED_EXTENSIONS)
}

/// Read and decode an image file into RGB
pub fn load_image(path: &Path) -> Result<LoadedImage, PipelineError> {
    if !is_supported(path) {
        return Err(PipelineError::UnsupportedInput(format!(
            "{} (supported: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let file_bytes = fs::metadata(path)
        .map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let image = image::open(path)
        .map_err(|source| PipelineError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::UnsupportedInput(format!(
            "{} decodes to an empty image",
            path.display()
        )));
    }

    log::info!(
        "Loaded {} ({}x{}, {} bytes on disk)",
        path.display(),
        image.width(),
        image.height(),
        file_bytes
    );

    Ok(LoadedImage {
        image,
        path: path.to_path_buf(),
        file_bytes,
    })
}
