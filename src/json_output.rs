//! JSON output for scripted use
//!
//! When the --json flag is enabled, results and errors are emitted as JSON
//! lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::image_processing::{Preview, SaveReport, SweepEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Jpeg,
    Ico,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Preview computed for the current parameters
    Preview {
        input_path: String,
        width: u32,
        height: u32,
        colors: u16,
        quality: u8,
        original_bytes: usize,
        compressed_bytes: usize,
        /// On-disk length of the input file
        file_bytes: Option<u64>,
        processing_time_ms: u128,
    },
    /// An export was written
    Saved {
        kind: ExportKind,
        output_path: String,
        bytes: usize,
    },
    /// One cell of the size sweep
    SweepRow {
        colors: u16,
        quality: u8,
        bytes: usize,
    },
    /// Processing failed
    Error { message: String },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit preview message
    pub fn preview(
        input_path: &Path,
        preview: &Preview,
        file_bytes: Option<u64>,
        processing_time_ms: u128,
    ) {
        Self::Preview {
            input_path: input_path.display().to_string(),
            width: preview.image.width(),
            height: preview.image.height(),
            colors: preview.params.colors.get(),
            quality: preview.params.quality.get(),
            original_bytes: preview.original_bytes,
            compressed_bytes: preview.compressed_bytes,
            file_bytes,
            processing_time_ms,
        }
        .emit();
    }

    /// Create and emit saved message
    pub fn saved(kind: ExportKind, report: &SaveReport) {
        Self::Saved {
            kind,
            output_path: report.path.display().to_string(),
            bytes: report.bytes,
        }
        .emit();
    }

    pub fn sweep_row(entry: &SweepEntry) {
        Self::SweepRow {
            colors: entry.colors.get(),
            quality: entry.quality.get(),
            bytes: entry.bytes,
        }
        .emit();
    }

    /// Create and emit error message
    pub fn error(message: impl Into<String>) {
        Self::Error {
            message: message.into(),
        }
        .emit();
    }
}
