//! Cell population and panel rendering parameters.

use serde::{Deserialize, Serialize};

use crate::cell::Rgb;
use crate::pool::GLIDER_OFFSETS;

/// Simulation parameters for the cell pool, stepper and compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Maximum number of live cells (a glider takes 5)
    pub max_cells: usize,

    /// Palette colours beyond this many are ignored; one audio channel per colour
    pub max_channels: usize,

    /// Distance between the centres of two adjacent panels (layout units)
    pub adjacent_panel_distance: f64,

    /// Transition time sent with every panel colour (units of 100 ms)
    pub transition_time: u16,

    /// Colour a panel shows with no cells nearby
    pub background: Rgb,

    /// Frames ignored after start-up while the audio pipeline settles
    pub warmup_frames: u32,

    /// Seed for anchor-panel selection; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_cells: 50,
            max_channels: 7,
            adjacent_panel_distance: 86.599995,
            transition_time: 2,
            background: Rgb::BLACK,
            warmup_frames: 200,
            rng_seed: None,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cells < GLIDER_OFFSETS.len() {
            return Err(format!(
                "max_cells must hold at least one glider ({}), got {}",
                GLIDER_OFFSETS.len(),
                self.max_cells
            ));
        }
        if self.max_channels == 0 {
            return Err("max_channels must be > 0".to_string());
        }
        if self.adjacent_panel_distance.is_nan() || self.adjacent_panel_distance <= 0.0 {
            return Err(format!(
                "adjacent_panel_distance must be > 0, got {}",
                self.adjacent_panel_distance
            ));
        }
        Ok(())
    }
}
