//! Bounded pool of live cells.
//!
//! Cells are kept in insertion order. The front is the oldest cell, which is
//! the first to go when room is needed, and the back is the newest, which
//! dominates the rendered colour.

use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;

use crate::cell::{Cell, Rgb};
use crate::layout::Panel;

/// Glider cell offsets relative to its anchor
pub const GLIDER_OFFSETS: [(f32, f32); 5] = [
    (1.0, -1.0),
    (1.0, 0.0),
    (0.0, -1.0),
    (-1.0, -1.0),
    (0.0, 1.0),
];

/// Ordered, capacity-bounded collection of cells
#[derive(Clone, Debug)]
pub struct SourcePool {
    cells: VecDeque<Cell>,
    capacity: usize,
}

impl SourcePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Cells from oldest to newest as one slice, rearranging storage if needed
    pub fn make_contiguous(&mut self) -> &[Cell] {
        self.cells.make_contiguous()
    }

    /// Add one cell, evicting the oldest if the pool is full
    pub fn spawn_single(&mut self, position: Vec2, color: Rgb) {
        if self.cells.len() >= self.capacity {
            self.evict_oldest(1);
        }
        self.cells.push_back(Cell { position, color });
        self.clamp_to_capacity();
    }

    /// Add a five-cell glider around `anchor`.
    ///
    /// If fewer than five slots are free, the five oldest cells are evicted
    /// first in one go. A pool smaller than a glider keeps its newest cells.
    pub fn spawn_glider(&mut self, anchor: Vec2, color: Rgb) {
        let headroom = self.capacity.saturating_sub(self.cells.len());
        if headroom < GLIDER_OFFSETS.len() {
            self.evict_oldest(GLIDER_OFFSETS.len());
        }
        for (dx, dy) in GLIDER_OFFSETS {
            self.cells.push_back(Cell::new(anchor.x + dx, anchor.y + dy, color));
        }
        self.clamp_to_capacity();
    }

    /// Remove the `n` oldest cells, keeping the order of the rest
    pub fn evict_oldest(&mut self, n: usize) {
        let n = n.min(self.cells.len());
        self.cells.drain(..n);
    }

    /// Replace the whole population, dropping from the front past capacity
    pub fn replace(&mut self, cells: Vec<Cell>) {
        self.cells = VecDeque::from(cells);
        self.clamp_to_capacity();
    }

    fn clamp_to_capacity(&mut self) {
        let excess = self.cells.len().saturating_sub(self.capacity);
        self.evict_oldest(excess);
    }
}

/// Pick the centroid of a uniformly random panel.
///
/// Returns `None` with fewer than two panels; there is nothing meaningful to
/// animate on a single panel.
pub fn choose_anchor<R: Rng + ?Sized>(panels: &[Panel], rng: &mut R) -> Option<Vec2> {
    if panels.len() < 2 {
        return None;
    }
    let panel = &panels[rng.gen_range(0..panels.len())];
    Some(panel.centroid())
}
