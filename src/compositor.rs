//! Panel colour compositing.
//!
//! Each panel starts from the background colour and blends in every cell in
//! pool order, taking a fraction of the cell's colour that falls off with
//! distance. Later cells partially overwrite earlier ones, so the newest
//! cells dominate. This is a left fold, not a weighted average: reordering
//! the pool changes the result.

use glam::Vec2;

use crate::cell::{Cell, Rgb};
use crate::layout::Panel;

/// Renders one colour per panel from the cell population
#[derive(Clone, Debug)]
pub struct PanelCompositor {
    adjacent_panel_distance: f64,
    background: Rgb,
}

impl PanelCompositor {
    pub fn new(adjacent_panel_distance: f64, background: Rgb) -> Self {
        Self {
            adjacent_panel_distance,
            background,
        }
    }

    /// Fraction of a cell's colour that reaches a panel `distance` away.
    ///
    /// 1 on top of the panel, 0.4 one panel away, approaching 0 far away.
    /// Not physical, tuned to look right on the panels.
    pub fn falloff(&self, distance: f32) -> f32 {
        let d = (distance as f64 / self.adjacent_panel_distance) as f32;
        let d2 = d * d;
        (1.0 / (d2 as f64 * 1.5 + 1.0)) as f32
    }

    /// Colour of a panel centred at `centroid`
    pub fn render_panel<'a>(
        &self,
        centroid: Vec2,
        cells: impl IntoIterator<Item = &'a Cell>,
    ) -> Rgb {
        let start = [
            self.background.r as f32,
            self.background.g as f32,
            self.background.b as f32,
        ];
        let [r, g, b] = cells.into_iter().fold(start, |acc, cell| {
            mix(acc, cell.color, self.falloff(centroid.distance(cell.position)))
        });
        Rgb::new(r as u8, g as u8, b as u8)
    }

    /// Colours for every panel, in layout order
    pub fn render(&self, panels: &[Panel], cells: &[Cell]) -> Vec<Rgb> {
        panels
            .iter()
            .map(|panel| self.render_panel(panel.centroid(), cells))
            .collect()
    }
}

/// Blend `color` into the accumulator by `factor`.
///
/// Mixed in double precision, accumulated in single.
pub fn mix(acc: [f32; 3], color: Rgb, factor: f32) -> [f32; 3] {
    let factor = factor as f64;
    let channel = |current: f32, source: u8| {
        (current as f64 * (1.0 - factor) + source as f64 * factor) as f32
    };
    [
        channel(acc[0], color.r),
        channel(acc[1], color.g),
        channel(acc[2], color.b),
    ]
}
