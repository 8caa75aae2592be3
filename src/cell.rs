//! Cells (light sources) and their colours.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every component by `intensity`, truncating toward zero
    pub fn scaled(self, intensity: f32) -> Self {
        let scale = |c: u8| (c as f32 * intensity).clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A positioned, coloured light source.
///
/// Identity is positional: two cells are equal when their coordinates
/// coincide exactly, whatever their colours.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub position: Vec2,
    pub color: Rgb,
}

impl Cell {
    pub fn new(x: f32, y: f32, color: Rgb) -> Self {
        Self {
            position: Vec2::new(x, y),
            color,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position.x == other.position.x && self.position.y == other.position.y
    }
}
