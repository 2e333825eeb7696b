use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use console::style;
use std::time::Instant;

use lossy_compressor::cli::Args;
use lossy_compressor::image_processing::report::{default_grid, run_sweep};
use lossy_compressor::image_processing::Session;
use lossy_compressor::json_output::{ExportKind, JsonMessage};
use lossy_compressor::utils::{
    create_progress_bar, error_println, format_duration, format_kb, init_logging,
    validate_inputs, verbose_println, warn_println,
};

fn main() {
    let matches = Args::command().get_matches();
    let mut args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    let json = args.json;

    if let Err(err) = run(&mut args, &matches) {
        if json {
            JsonMessage::error(format!("{:#}", err));
        } else {
            error_println(&format!("{:#}", err));
        }
        std::process::exit(1);
    }
}

fn run(args: &mut Args, matches: &ArgMatches) -> Result<()> {
    let start_time = Instant::now();

    args.load_and_merge_config(matches)?;
    init_logging(args.verbose);

    if !args.json {
        println!("{}", style("Lossy Image Compressor").bold().blue());
        println!("{}", style("Palette quantization + JPEG + ICO").dim());
        println!();
    }

    validate_inputs(args)?;

    let params = args.preview_params();
    let fill = args
        .canvas_fill()
        .map_err(|e| anyhow::anyhow!(e))?;
    let parallel_jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    let verbose = args.verbose && !args.json;

    if verbose {
        println!("{}", style("Configuration:").bold());
        println!("  Input: {}", args.input.display());
        println!("  Colors: {}", params.colors.get());
        println!("  Quality: {}", params.quality.get());
        println!("  Dithering: {:?}", params.dithering);
        println!("  Icon fill: {:?}", fill);
        println!("  Parallel jobs: {}", parallel_jobs);
        println!();
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_jobs)
        .build_global()
        .context("Failed to configure the worker pool")?;

    let mut session = Session::new(params, fill);
    session
        .load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if let Some(file_bytes) = session.source_file_bytes() {
        verbose_println(
            verbose,
            &format!("File size on disk: {}", format_kb(file_bytes as usize)),
        );
    }

    let preview_start = Instant::now();
    let preview = session
        .refresh()
        .context("Failed to compute the preview")?
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No image loaded"))?;
    let preview_time = preview_start.elapsed();

    if args.json {
        JsonMessage::preview(
            &args.input,
            &preview,
            session.source_file_bytes(),
            preview_time.as_millis(),
        );
    } else {
        println!("{}", style(preview.status_line()).bold().green());
        verbose_println(
            verbose,
            &format!(
                "{}x{} at {:.1}% of the baseline, computed in {}",
                preview.image.width(),
                preview.image.height(),
                preview.ratio_percent(),
                format_duration(preview_time)
            ),
        );
        if preview.compressed_bytes >= preview.original_bytes {
            warn_println("Compressed result is not smaller than the quality-95 baseline");
        }
    }

    if args.sweep {
        let (colors, qualities) = default_grid();
        let original = session
            .original()
            .ok_or_else(|| anyhow::anyhow!("No image loaded"))?;

        let progress = if args.json {
            indicatif::ProgressBar::hidden()
        } else {
            create_progress_bar((colors.len() * qualities.len()) as u64)?
        };
        progress.set_message("Measuring sizes");

        let sweep = run_sweep(&original, &colors, &qualities, params.dithering, &progress)
            .context("Size sweep failed")?;
        progress.finish_and_clear();

        if args.json {
            for entry in &sweep.entries {
                JsonMessage::sweep_row(entry);
            }
        } else {
            sweep.print();
        }
    }

    if let Some(path) = &args.save_jpeg {
        if let Some(report) = session
            .save_jpeg(path)
            .with_context(|| format!("Failed to save {}", path.display()))?
        {
            if args.json {
                JsonMessage::saved(ExportKind::Jpeg, &report);
            } else {
                println!("{}", style(format!("Saved: {}", report.file_name())).green());
                verbose_println(verbose, &format!("Wrote {}", format_kb(report.bytes)));
            }
        }
    }

    if let Some(path) = &args.save_ico {
        if let Some(report) = session
            .save_ico(path)
            .with_context(|| format!("Failed to save {}", path.display()))?
        {
            if args.json {
                JsonMessage::saved(ExportKind::Ico, &report);
            } else {
                println!(
                    "{}",
                    style(format!("Saved ICO: {}", report.file_name())).green()
                );
                verbose_println(verbose, &format!("Wrote {}", format_kb(report.bytes)));
            }
        }
    }

    if !args.json {
        println!();
        println!(
            "{} {}",
            style("Done in").dim(),
            style(format_duration(start_time.elapsed())).bold()
        );
    }

    Ok(())
}
