use std::path::PathBuf;

/// Errors raised by the transformation pipeline.
///
/// Every stage has its own variant so a caller can tell a codec failure
/// apart from a resampling or packaging failure without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to load image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("JPEG encoding failed: {0}")]
    Encode(image::ImageError),

    #[error("JPEG decoding failed: {0}")]
    Decode(image::ImageError),

    #[error("Resampling failed: {0}")]
    Resize(String),

    #[error("Icon packaging failed: {0}")]
    IconPackaging(std::io::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
