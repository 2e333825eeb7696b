use anyhow::Result;
use console::style;
use image::Rgb;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;
use crate::image_processing::loader::{is_supported, SUPPORTED_EXTENSIONS};

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Byte count in kilobytes with one decimal, e.g. `12.3 KB`
pub fn format_kb(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// The size line shown after every preview update
pub fn format_size_status(original_bytes: usize, compressed_bytes: usize) -> String {
    format!(
        "Original: {} | Compressed: {}",
        format_kb(original_bytes),
        format_kb(compressed_bytes)
    )
}

/// Initialise the `log` backend
///
/// `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow::anyhow!(
            "Input file does not exist: {}",
            args.input.display()
        ));
    }
    if !args.input.is_file() {
        return Err(anyhow::anyhow!(
            "Input path is not a file: {}",
            args.input.display()
        ));
    }
    if !is_supported(&args.input) {
        return Err(anyhow::anyhow!(
            "Unsupported input format: {} (supported: {})",
            args.input.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }

    // Validate job count
    if args.jobs > 32 {
        return Err(anyhow::anyhow!(
            "Job count too high (max 32), got: {}",
            args.jobs
        ));
    }

    if args.fill.parse::<crate::image_processing::CanvasFill>().is_err() {
        return Err(anyhow::anyhow!(
            "Invalid fill '{}'. Expected 'edge' or a hex color like #000000",
            args.fill
        ));
    }

    Ok(())
}

/// Parse `#RGB` or `#RRGGBB` into a color
pub fn parse_hex_color(color: &str) -> Option<Rgb<u8>> {
    let hex_part = color.strip_prefix('#')?;
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex_part.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (channel, digit) in channels.iter_mut().zip(hex_part.chars()) {
                let value = digit.to_digit(16)? as u8;
                *channel = value * 17;
            }
            Some(Rgb(channels))
        }
        6 => {
            let r = u8::from_str_radix(&hex_part[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex_part[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex_part[4..6], 16).ok()?;
            Some(Rgb([r, g, b]))
        }
        _ => None,
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[&str]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext.as_str())
    } else {
        false
    }
}

/// Append `extension` when the path has none
pub fn with_default_extension(path: PathBuf, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(extension)
    }
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
