// Library exports for reuse by GUI and other applications
pub mod cli;
pub mod config_file;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, DitherMethod};
pub use image_processing::{
    CanvasFill, ColorCount, Dithering, PipelineError, Preview, PreviewParams, PreviewScheduler,
    Quality, SaveReport, Session,
};
pub use json_output::JsonMessage;
