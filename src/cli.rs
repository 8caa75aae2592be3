//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::cell::Rgb;
use crate::error::Result;
use crate::layout::{default_palette, load_layout, parse_palette, strip_layout, Panel};
use crate::params::Config;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "beatglider")]
#[command(about = "Audio-reactive Game of Life for light panels", long_about = None)]
pub struct Args {
    /// Drive the show from a WAV file instead of the built-in composition
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Length of the built-in composition to render (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    pub duration: f32,

    /// JSON configuration file; missing fields use defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Panel layout JSON file: [{"id": 1, "x": 0.0, "y": 0.0}, ...]
    #[arg(long, value_name = "PATH")]
    pub layout: Option<PathBuf>,

    /// Number of panels in a generated straight strip (ignored with --layout)
    #[arg(long, value_name = "COUNT", default_value = "9")]
    pub panels: u16,

    /// Comma-separated hex palette, one audio channel per colour
    #[arg(long, value_name = "COLOURS")]
    pub palette: Option<String>,

    /// Seed for anchor selection (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the start-up warm-up frames
    #[arg(long)]
    pub no_warmup: bool,

    /// Print every panel colour of every frame
    #[arg(long)]
    pub print: bool,

    /// Write a PNG preview (rows = frames, columns = panels)
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.seed.is_some() {
            config.simulation.rng_seed = self.seed;
        }
        if self.no_warmup {
            config.simulation.warmup_frames = 0;
        }
        config.validate()?;
        Ok(config)
    }

    /// Layout from file, or a generated strip spaced one panel apart
    pub fn load_layout(&self, config: &Config) -> Result<Vec<Panel>> {
        match &self.layout {
            Some(path) => load_layout(path),
            None => {
                info!(panels = self.panels, "using generated strip layout");
                Ok(strip_layout(
                    self.panels,
                    config.simulation.adjacent_panel_distance as f32,
                ))
            }
        }
    }

    pub fn load_palette(&self) -> Result<Vec<Rgb>> {
        match &self.palette {
            Some(list) => parse_palette(list),
            None => Ok(default_palette()),
        }
    }
}
