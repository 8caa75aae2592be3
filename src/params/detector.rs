//! Beat detector tuning.

use serde::{Deserialize, Serialize};

/// Adaptive beat detector parameters (shared by every channel)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Fraction of the running max a sample must rise above the floor to count as a beat
    /// Typical range: 0.5-0.7
    pub trigger_threshold: f64,

    /// Lowest intensity a beat can produce (0-1)
    pub minimum_intensity: f64,

    /// Approximate number of peaks the running max tracks
    pub effective_trail: u32,

    /// Running max every channel starts with, so the detector works from the first frame
    pub initial_running_max: u32,

    /// Loudest-beat record every channel starts with
    pub initial_maximum_trigger: u32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            trigger_threshold: 0.7,
            minimum_intensity: 0.2,
            effective_trail: 4,
            initial_running_max: 3,
            initial_maximum_trigger: 1,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.trigger_threshold.is_nan() || self.trigger_threshold < 0.0 {
            return Err(format!(
                "trigger_threshold must be >= 0, got {}",
                self.trigger_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.minimum_intensity) {
            return Err(format!(
                "minimum_intensity must be in [0, 1], got {}",
                self.minimum_intensity
            ));
        }
        if self.effective_trail == 0 {
            return Err("effective_trail must be > 0".to_string());
        }
        Ok(())
    }
}
