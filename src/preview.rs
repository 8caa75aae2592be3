//! PNG preview of a run.
//!
//! Each frame becomes a horizontal band and each panel a column, so reading
//! the image top to bottom replays the show.

use image::{Rgb as Pixel, RgbImage};
use std::path::Path;

use crate::cell::Rgb;
use crate::error::Result;
use crate::params::PreviewConfig;
use crate::session::PanelFrame;

/// Collects rendered frames for a preview image
#[derive(Debug, Default)]
pub struct PreviewRecorder {
    rows: Vec<Vec<Rgb>>,
}

impl PreviewRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame; empty frames (warm-up) are skipped
    pub fn record(&mut self, frames: &[PanelFrame]) {
        if !frames.is_empty() {
            self.rows.push(frames.iter().map(|f| f.color).collect());
        }
    }

    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    /// Build the preview image
    pub fn render(&self, config: &PreviewConfig) -> RgbImage {
        let panels = self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let width = panels * config.panel_width_px;
        let height = self.rows.len() as u32 * config.frame_height_px;

        RgbImage::from_fn(width, height, |x, y| {
            let row = &self.rows[(y / config.frame_height_px) as usize];
            let color = row
                .get((x / config.panel_width_px) as usize)
                .copied()
                .unwrap_or_default();
            Pixel([color.r, color.g, color.b])
        })
    }

    /// Render and write the preview as PNG
    pub fn save(&self, path: impl AsRef<Path>, config: &PreviewConfig) -> Result<()> {
        self.render(config).save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(panel_id: u16, color: Rgb) -> PanelFrame {
        PanelFrame {
            panel_id,
            color,
            transition_time: 2,
        }
    }

    #[test]
    fn test_image_layout() {
        let mut recorder = PreviewRecorder::new();
        recorder.record(&[]);
        recorder.record(&[frame(1, Rgb::new(255, 0, 0)), frame(2, Rgb::new(0, 0, 255))]);
        recorder.record(&[frame(1, Rgb::new(0, 255, 0)), frame(2, Rgb::BLACK)]);

        let config = PreviewConfig {
            panel_width_px: 4,
            frame_height_px: 3,
        };
        let image = recorder.render(&config);

        assert_eq!(recorder.frame_count(), 2);
        assert_eq!(image.dimensions(), (8, 6));
        assert_eq!(image.get_pixel(0, 0), &Pixel([255, 0, 0]));
        assert_eq!(image.get_pixel(7, 2), &Pixel([0, 0, 255]));
        assert_eq!(image.get_pixel(3, 5), &Pixel([0, 255, 0]));
    }

    #[test]
    fn test_save_png() {
        let mut recorder = PreviewRecorder::new();
        recorder.record(&[frame(1, Rgb::new(10, 20, 30))]);
        let path = std::env::temp_dir().join("beatglider_preview_test.png");

        let result = recorder.save(&path, &PreviewConfig::default());
        let written = std::fs::metadata(&path).map(|m| m.len() > 0);
        let _ = std::fs::remove_file(&path);

        assert!(result.is_ok());
        assert!(matches!(written, Ok(true)));
    }
}
