//! Panel layout and colour palette supplied by the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cell::Rgb;
use crate::error::{Error, Result};

/// A physical panel with a fixed centre
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: u16,
    pub x: f32,
    pub y: f32,
}

impl Panel {
    pub fn new(id: u16, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn centroid(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Load a layout from a JSON array of `{"id", "x", "y"}` objects
pub fn load_layout(path: impl AsRef<Path>) -> Result<Vec<Panel>> {
    let text = std::fs::read_to_string(path)?;
    let panels: Vec<Panel> = serde_json::from_str(&text)?;
    if panels.is_empty() {
        return Err(Error::Layout("layout has no panels".to_string()));
    }
    Ok(panels)
}

/// A straight row of `count` panels, `spacing` apart, centred on the origin
pub fn strip_layout(count: u16, spacing: f32) -> Vec<Panel> {
    let offset = (count.saturating_sub(1)) as f32 * spacing / 2.0;
    (0..count)
        .map(|i| Panel::new(i + 1, i as f32 * spacing - offset, 0.0))
        .collect()
}

/// Seven-colour rainbow used when no palette is given
pub fn default_palette() -> Vec<Rgb> {
    vec![
        Rgb::new(255, 0, 0),
        Rgb::new(255, 127, 0),
        Rgb::new(255, 255, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
        Rgb::new(75, 0, 130),
        Rgb::new(148, 0, 211),
    ]
}

/// Parse a comma-separated list of hex colours (`#ff0000,00ff00`)
pub fn parse_palette(list: &str) -> Result<Vec<Rgb>> {
    let palette = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            Rgb::from_hex(s).ok_or_else(|| Error::Palette(format!("bad colour '{}'", s.trim())))
        })
        .collect::<Result<Vec<_>>>()?;
    if palette.is_empty() {
        return Err(Error::Palette("palette is empty".to_string()));
    }
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_layout_is_centred() {
        let panels = strip_layout(3, 10.0);

        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0], Panel::new(1, -10.0, 0.0));
        assert_eq!(panels[1], Panel::new(2, 0.0, 0.0));
        assert_eq!(panels[2], Panel::new(3, 10.0, 0.0));
    }

    #[test]
    fn test_load_layout() {
        let path = std::env::temp_dir().join("beatglider_layout_test.json");
        std::fs::write(
            &path,
            r#"[{"id": 12, "x": 0.0, "y": 0.0}, {"id": 40, "x": 86.6, "y": -50.0}]"#,
        )
        .unwrap();

        let panels = load_layout(&path);
        let _ = std::fs::remove_file(&path);

        let panels = panels.unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[1].id, 40);
        assert_eq!(panels[1].centroid(), Vec2::new(86.6, -50.0));
    }

    #[test]
    fn test_load_empty_layout_fails() {
        let path = std::env::temp_dir().join("beatglider_empty_layout_test.json");
        std::fs::write(&path, "[]").unwrap();

        let result = load_layout(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(Error::Layout(_))));
    }

    #[test]
    fn test_parse_palette() {
        let palette = parse_palette("#ff0000, 00ff00,").unwrap();
        assert_eq!(palette, vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);

        assert!(matches!(parse_palette("#ff00"), Err(Error::Palette(_))));
        assert!(matches!(parse_palette(""), Err(Error::Palette(_))));
    }
}
