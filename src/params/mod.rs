//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants of the engine live here with:
//! - Units (frames, Hz, panel-space distance, 100 ms transition ticks)
//! - Documented ranges and meanings
//! - A `validate()` that rejects values the engine cannot run with

mod analysis;
mod detector;
mod preview;
mod simulation;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

// Re-export all types
pub use analysis::AnalysisConfig;
pub use detector::DetectorParams;
pub use preview::PreviewConfig;
pub use simulation::SimulationParams;

/// Everything a session and its host need, loadable from one JSON file.
///
/// Any section or field left out of the file keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorParams,
    pub simulation: SimulationParams,
    pub analysis: AnalysisConfig,
    pub preview: PreviewConfig,
}

impl Config {
    /// Load a configuration file, filling gaps with defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.detector.validate().map_err(Error::Config)?;
        self.simulation.validate().map_err(Error::Config)?;
        self.analysis.validate().map_err(Error::Config)?;
        self.preview.validate().map_err(Error::Config)?;
        Ok(())
    }
}
