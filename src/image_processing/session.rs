use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::encode::measure_baseline;
use super::export::{save_ico, save_jpeg, SaveReport};
use super::icon::CanvasFill;
use super::loader::load_image;
use super::pipeline::{render_preview, Preview};
use super::{PipelineError, PreviewParams};

/// Where the current original came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: Option<PathBuf>,
    /// Length of the input file on disk, when there was one
    pub file_bytes: Option<u64>,
}

/// State owned by a front-end between pipeline calls
///
/// Holds the loaded original, its baseline size (measured once per image),
/// the live parameters and the last preview that rendered successfully.
/// Every preview and export operation is a silent no-op (`Ok(None)`) until an
/// image has been loaded.
#[derive(Debug, Default)]
pub struct Session {
    original: Option<Arc<RgbImage>>,
    source: Option<SourceInfo>,
    baseline_bytes: Option<usize>,
    params: PreviewParams,
    fill: CanvasFill,
    preview: Option<Preview>,
}

impl Session {
    pub fn new(params: PreviewParams, fill: CanvasFill) -> Self {
        Self {
            params,
            fill,
            ..Self::default()
        }
    }

    /// Load an image file and make it the new original
    ///
    /// On failure the previous original and preview stay untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), PipelineError> {
        let loaded = load_image(path)?;
        self.set_original(
            loaded.image,
            SourceInfo {
                path: Some(loaded.path),
                file_bytes: Some(loaded.file_bytes),
            },
        )
    }

    /// Replace the original with an already decoded image
    pub fn set_original(&mut self, image: RgbImage, source: SourceInfo) -> Result<(), PipelineError> {
        let baseline = measure_baseline(&image)?;

        self.original = Some(Arc::new(image));
        self.source = Some(source);
        self.baseline_bytes = Some(baseline);
        self.preview = None;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    /// Shared handle to the original, for handing to a worker thread
    pub fn original(&self) -> Option<Arc<RgbImage>> {
        self.original.clone()
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }

    /// Size of the original re-encoded at the reference quality
    pub fn baseline_bytes(&self) -> Option<usize> {
        self.baseline_bytes
    }

    pub fn source_file_bytes(&self) -> Option<u64> {
        self.source.as_ref().and_then(|source| source.file_bytes)
    }

    pub fn params(&self) -> PreviewParams {
        self.params
    }

    pub fn set_params(&mut self, params: PreviewParams) {
        self.params = params;
    }

    pub fn fill(&self) -> CanvasFill {
        self.fill
    }

    pub fn set_fill(&mut self, fill: CanvasFill) {
        self.fill = fill;
    }

    /// Recompute the preview for the current parameters
    ///
    /// A failed render leaves the previous preview in place.
    pub fn refresh(&mut self) -> Result<Option<&Preview>, PipelineError> {
        let (Some(original), Some(baseline)) = (self.original.as_ref(), self.baseline_bytes) else {
            return Ok(None);
        };

        let preview = render_preview(original, &self.params, baseline)?;
        self.preview = Some(preview);
        Ok(self.preview.as_ref())
    }

    /// Install a preview rendered elsewhere (e.g. on a worker thread)
    ///
    /// Ignored when no image is loaded, so a late result cannot resurrect a
    /// cleared session.
    pub fn apply_preview(&mut self, preview: Preview) {
        if self.original.is_some() {
            self.preview = Some(preview);
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn status_line(&self) -> Option<String> {
        self.preview.as_ref().map(Preview::status_line)
    }

    /// Write the current preview as a JPEG at the quality it was rendered with
    pub fn save_jpeg(&self, path: &Path) -> Result<Option<SaveReport>, PipelineError> {
        match &self.preview {
            Some(preview) => save_jpeg(&preview.image, preview.params.quality, path).map(Some),
            None => Ok(None),
        }
    }

    /// Write the current preview as a multi-resolution icon
    pub fn save_ico(&self, path: &Path) -> Result<Option<SaveReport>, PipelineError> {
        match &self.preview {
            Some(preview) => save_ico(&preview.image, self.fill, path).map(Some),
            None => Ok(None),
        }
    }
}
