use image::RgbImage;
use indicatif::ProgressBar;
use prettytable::{format, Cell, Row, Table};
use rayon::prelude::*;

use super::encode::{encode_jpeg_bytes, measure_baseline};
use super::quantize::{quantize_with_dithering, Dithering};
use super::{ColorCount, PipelineError, Quality};
use crate::utils::format_kb;

/// Color counts probed by the default sweep
pub const SWEEP_COLORS: [u32; 5] = [4, 16, 32, 64, 256];
/// Quality levels probed by the default sweep
pub const SWEEP_QUALITIES: [u32; 5] = [10, 30, 50, 75, 95];

/// Encoded size for one (colors, quality) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepEntry {
    pub colors: ColorCount,
    pub quality: Quality,
    pub bytes: usize,
}

/// Compressed sizes of one image over a grid of parameters
#[derive(Debug, Clone)]
pub struct SizeSweep {
    pub original_bytes: usize,
    pub colors: Vec<ColorCount>,
    pub qualities: Vec<Quality>,
    /// Row-major: one row per color count, one column per quality
    pub entries: Vec<SweepEntry>,
}

pub fn default_grid() -> (Vec<ColorCount>, Vec<Quality>) {
    (
        SWEEP_COLORS.iter().map(|&c| ColorCount::new(c)).collect(),
        SWEEP_QUALITIES.iter().map(|&q| Quality::new(q)).collect(),
    )
}

/// Measure the compressed size for every combination of `colors` and `qualities`
///
/// Each color count is quantized once and then encoded at every quality. Color
/// counts are processed in parallel on the global rayon pool; `progress` is
/// advanced once per measured combination.
pub fn run_sweep(
    original: &RgbImage,
    colors: &[ColorCount],
    qualities: &[Quality],
    dithering: Dithering,
    progress: &ProgressBar,
) -> Result<SizeSweep, PipelineError> {
    let original_bytes = measure_baseline(original)?;

    let rows = colors
        .par_iter()
        .map(|&color_count| {
            let quantized = quantize_with_dithering(original, color_count, dithering);
            qualities
                .iter()
                .map(|&quality| {
                    let artifact = encode_jpeg_bytes(&quantized, quality)?;
                    progress.inc(1);
                    Ok::<_, PipelineError>(SweepEntry {
                        colors: color_count,
                        quality,
                        bytes: artifact.len(),
                    })
                })
                .collect::<Result<Vec<_>, PipelineError>>()
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(SizeSweep {
        original_bytes,
        colors: colors.to_vec(),
        qualities: qualities.to_vec(),
        entries: rows.into_iter().flatten().collect(),
    })
}

impl SizeSweep {
    pub fn size_at(&self, colors: ColorCount, quality: Quality) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.colors == colors && entry.quality == quality)
            .map(|entry| entry.bytes)
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let mut header = vec![Cell::new("Colors \\ Quality")];
        header.extend(self.qualities.iter().map(|q| Cell::new(&q.get().to_string())));
        table.add_row(Row::new(header));

        for &color_count in &self.colors {
            let mut cells = vec![Cell::new(&color_count.get().to_string())];
            for &quality in &self.qualities {
                let text = self
                    .size_at(color_count, quality)
                    .map(format_kb)
                    .unwrap_or_else(|| "-".to_string());
                cells.push(Cell::new(&text));
            }
            table.add_row(Row::new(cells));
        }

        table
    }

    pub fn print(&self) {
        println!(
            "\n📊 Compressed size by colors and quality (baseline {})\n",
            format_kb(self.original_bytes)
        );
        self.to_table().printstd();
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            let noise = ((x.wrapping_mul(73856093) ^ y.wrapping_mul(19349663)) % 23) as u8;
            Rgb([
                ((x * 255 / width) as u8).wrapping_add(noise),
                (y * 255 / height) as u8,
                ((x * y) % 256) as u8,
            ])
        })
    }

    #[test]
    fn test_sweep_covers_grid() {
        let img = create_test_image(64, 64);
        let colors = vec![ColorCount::new(4), ColorCount::new(64)];
        let qualities = vec![Quality::new(20), Quality::new(80)];
        let progress = ProgressBar::hidden();

        let sweep = run_sweep(&img, &colors, &qualities, Dithering::None, &progress).unwrap();

        assert_eq!(sweep.entries.len(), 4);
        assert_eq!(progress.position(), 4);
        assert_eq!(sweep.entries[0].colors, colors[0]);
        assert_eq!(sweep.entries[1].quality, qualities[1]);
        assert!(sweep.original_bytes > 0);
    }

    #[test]
    fn test_size_grows_with_quality() {
        let img = create_test_image(96, 96);
        let colors = vec![ColorCount::new(64)];
        let qualities = vec![Quality::new(10), Quality::new(90)];

        let sweep = run_sweep(&img, &colors, &qualities, Dithering::None, &ProgressBar::hidden()).unwrap();

        let low = sweep.size_at(colors[0], qualities[0]).unwrap();
        let high = sweep.size_at(colors[0], qualities[1]).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_table_shape() {
        let img = create_test_image(32, 32);
        let (colors, qualities) = default_grid();
        let sweep = run_sweep(&img, &colors, &qualities, Dithering::None, &ProgressBar::hidden()).unwrap();

        let table = sweep.to_table();
        assert_eq!(table.len(), SWEEP_COLORS.len() + 1);
    }
}
