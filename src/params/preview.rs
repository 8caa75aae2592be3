//! Preview image configuration.

use serde::{Deserialize, Serialize};

/// PNG preview of a run: one row per frame, one column per panel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Width of each panel column (pixels)
    pub panel_width_px: u32,

    /// Height of each frame row (pixels)
    pub frame_height_px: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            panel_width_px: 16,
            frame_height_px: 2,
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.panel_width_px == 0 || self.frame_height_px == 0 {
            return Err("preview cell size must be > 0".to_string());
        }
        Ok(())
    }
}
