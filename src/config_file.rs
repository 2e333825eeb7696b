use crate::cli::{Args, DitherMethod};
use crate::image_processing::{CanvasFill, MAX_COLORS, MAX_QUALITY, MIN_COLORS, MIN_QUALITY};
use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;

/// Settings file accepted by `--config`
///
/// ```json
/// { "colors": 16, "quality": 30, "dither": "floyd-steinberg", "fill": "edge" }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub colors: Option<u16>,
    pub quality: Option<u8>,
    pub dither: Option<String>,
    pub fill: Option<String>,
    pub jobs: Option<usize>,
    pub verbose: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: ConfigFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            self.merge_from_config(config, matches)?;

            log::info!("Loaded configuration from: {:?}", config_path);
        }
        Ok(())
    }

    /// Apply config values for every setting not given on the command line
    pub fn merge_from_config(&mut self, config: ConfigFile, matches: &ArgMatches) -> Result<()> {
        let given = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        if !given("colors") {
            if let Some(colors) = config.colors {
                if !(MIN_COLORS..=MAX_COLORS).contains(&colors) {
                    anyhow::bail!(
                        "Config value 'colors' must be between {} and {}, got {}",
                        MIN_COLORS,
                        MAX_COLORS,
                        colors
                    );
                }
                self.colors = colors;
            }
        }

        if !given("quality") {
            if let Some(quality) = config.quality {
                if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
                    anyhow::bail!(
                        "Config value 'quality' must be between {} and {}, got {}",
                        MIN_QUALITY,
                        MAX_QUALITY,
                        quality
                    );
                }
                self.quality = quality;
            }
        }

        if !given("dither") {
            if let Some(method) = config.dither {
                self.dither = match method.as_str() {
                    "floydSteinberg" => DitherMethod::FloydSteinberg,
                    other => DitherMethod::from_str(other, true).map_err(|_| {
                        anyhow::anyhow!(
                            "Config value 'dither' must be 'none' or 'floyd-steinberg', got '{}'",
                            method
                        )
                    })?,
                };
            }
        }

        if !given("fill") {
            if let Some(fill) = config.fill {
                fill.parse::<CanvasFill>()
                    .map_err(|e| anyhow::anyhow!("Config value 'fill': {}", e))?;
                self.fill = fill;
            }
        }

        if !given("jobs") {
            if let Some(jobs) = config.jobs {
                self.jobs = jobs;
            }
        }

        if !given("verbose") {
            if let Some(verbose) = config.verbose {
                self.verbose = verbose;
            }
        }

        Ok(())
    }
}
