use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::image_processing::{
    CanvasFill, ColorCount, Dithering, PreviewParams, Quality, DEFAULT_COLORS, DEFAULT_QUALITY,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum DitherMethod {
    /// Nearest palette color, no error diffusion (posterized look)
    #[default]
    #[value(name = "none")]
    None,
    /// Floyd-Steinberg error diffusion against the adaptive palette
    #[value(name = "floyd-steinberg")]
    FloydSteinberg,
}

impl From<DitherMethod> for Dithering {
    fn from(method: DitherMethod) -> Self {
        match method {
            DitherMethod::None => Dithering::None,
            DitherMethod::FloydSteinberg => Dithering::FloydSteinberg,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "lossy-compressor",
    about = "Palette quantization + JPEG re-encode with exact size reporting and ICO export",
    long_about = "
Lossy Image Compressor

Reduces an image to an adaptive palette, round-trips it through the JPEG codec
and reports the exact encoded size against a quality-95 baseline. The result
can be written as a JPEG or packed into a multi-resolution ICO file
(16, 32, 48 and 256 pixel frames, letterboxed onto a square canvas).

Example Usage:
  # Show the size for the default parameters (32 colors, quality 50)
  lossy-compressor -i photo.png

  # 16 colors at quality 30, write the result as JPEG
  lossy-compressor -i photo.png -c 16 -q 30 --save-jpeg small.jpg

  # Build an icon, extending the image edges instead of black bars
  lossy-compressor -i logo.png -c 64 --fill edge --save-ico app.ico

  # Print compressed sizes over a grid of colors x qualities
  lossy-compressor -i photo.jpg --sweep --verbose

  # Machine-readable output
  lossy-compressor -i photo.jpg --json --save-ico out.ico"
)]
pub struct Args {
    /// Input image (jpg, jpeg, png, bmp, gif)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Palette size used for quantization (4-256)
    #[arg(
        short = 'c',
        long = "colors",
        default_value_t = DEFAULT_COLORS,
        value_parser = clap::value_parser!(u16).range(4..=256),
        value_name = "N"
    )]
    pub colors: u16,

    /// JPEG quality for the compressed result (1-100)
    #[arg(
        short = 'q',
        long = "quality",
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100),
        value_name = "N"
    )]
    pub quality: u8,

    /// How pixels are mapped onto the palette
    #[arg(long = "dither", default_value = "none", value_name = "METHOD")]
    pub dither: DitherMethod,

    /// Letterbox fill for icon export: a hex color (#RRGGBB) or 'edge'
    #[arg(long = "fill", default_value = "#000000", value_name = "COLOR|edge")]
    pub fill: String,

    /// Write the compressed result as a JPEG file
    #[arg(long = "save-jpeg", value_name = "FILE")]
    pub save_jpeg: Option<PathBuf>,

    /// Write the compressed result as a multi-resolution ICO file
    #[arg(long = "save-ico", value_name = "FILE")]
    pub save_ico: Option<PathBuf>,

    /// Print a table of compressed sizes over several colors and qualities
    #[arg(long = "sweep")]
    pub sweep: bool,

    /// Number of parallel jobs for the sweep (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", default_value = "0", value_name = "N")]
    pub jobs: usize,

    /// Load settings from a JSON config file (command-line flags take precedence)
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Emit JSON lines instead of styled output
    #[arg(long = "json")]
    pub json: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn preview_params(&self) -> PreviewParams {
        PreviewParams {
            colors: ColorCount::new(self.colors as u32),
            quality: Quality::new(self.quality as u32),
            dithering: self.dither.into(),
        }
    }

    pub fn canvas_fill(&self) -> Result<CanvasFill, String> {
        self.fill.parse()
    }
}
