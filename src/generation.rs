//! Cellular-automaton generation step.
//!
//! Loosely follows Conway's rules on free-floating cells rather than a grid:
//! a cell survives with two or three neighbours, and three birth rules look
//! for exactly three cells lined up on particular offsets. Evaluation order
//! is survivors, then births A, B and C, each scanning the pool oldest
//! first. That order decides which candidate survives deduplication and which
//! are dropped by the capacity clamp, so it must not change.

use tracing::trace;

use crate::cell::{Cell, Rgb};
use crate::pool::SourcePool;

/// How a newborn cell gets its colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BirthColor {
    /// Mean of the three neighbours that caused the birth
    Averaged,
    /// Copied from the cell the rule was evaluated for
    Parent,
}

/// Birth rule looking along one diagonal direction
#[derive(Clone, Copy, Debug)]
struct BirthRule {
    dx: f32,
    dy: f32,
    color: BirthColor,
}

const BIRTH_RULES: [BirthRule; 3] = [
    // A: east / north-east
    BirthRule {
        dx: 1.0,
        dy: 1.0,
        color: BirthColor::Averaged,
    },
    // B: west / north-west
    BirthRule {
        dx: -1.0,
        dy: 1.0,
        color: BirthColor::Parent,
    },
    // C: west / south-west
    BirthRule {
        dx: -1.0,
        dy: -1.0,
        color: BirthColor::Averaged,
    },
];

/// Neighbour count a cell needs to survive
const SURVIVAL_COUNTS: [usize; 2] = [2, 3];

/// Neighbour count that causes a birth
const BIRTH_COUNT: usize = 3;

/// Advances a [`SourcePool`] by one generation
#[derive(Clone, Debug)]
pub struct GenerationStepper {
    capacity: usize,
}

impl GenerationStepper {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Replace the pool's population with its next generation
    pub fn advance(&self, pool: &mut SourcePool) {
        let before = pool.len();
        let next = self.next_generation(pool.make_contiguous());
        trace!(before, after = next.len(), "generation");
        pool.replace(next);
    }

    /// Compute the next generation of `cells` (oldest first) without mutating them
    pub fn next_generation(&self, cells: &[Cell]) -> Vec<Cell> {
        let mut next: Vec<Cell> = cells
            .iter()
            .enumerate()
            .filter(|&(i, _)| SURVIVAL_COUNTS.contains(&neighbour_count(cells, i)))
            .map(|(_, cell)| *cell)
            .collect();

        for rule in &BIRTH_RULES {
            next.extend(births(cells, rule));
        }

        let mut next = dedup(next);
        let excess = next.len().saturating_sub(self.capacity);
        next.drain(..excess);
        next
    }
}

/// Proximity test used for survival.
///
/// The y-term ORs two conditions that are true for any finite y, so only the
/// open x-interval `(a.x - 1, a.x + 1)` restricts neighbourhood.
fn is_near(a: &Cell, b: &Cell) -> bool {
    (a.x() + 1.0 > b.x() && a.x() - 1.0 < b.x()) && (a.y() + 1.0 > b.y() || a.y() - 1.0 < b.y())
}

fn neighbour_count(cells: &[Cell], i: usize) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != i && is_near(&cells[i], other))
        .count()
}

/// Cells born under `rule`, in pool order
fn births(cells: &[Cell], rule: &BirthRule) -> Vec<Cell> {
    let mut born = Vec::new();
    for cell in cells {
        let (x, y) = (cell.x(), cell.y());
        let (near_x, far_x) = (x + rule.dx, x + 2.0 * rule.dx);
        let (near_y, far_y) = (y + rule.dy, y + 2.0 * rule.dy);

        let mut count = 0;
        let mut sum = [0u32; 3];
        for other in cells {
            let lined_up = other.x() == near_x
                || other.x() == far_x
                || other.y() == near_y
                || other.y() == far_y;
            let on_target = other.x() == near_x && other.y() == near_y;
            if lined_up && !on_target {
                count += 1;
                sum[0] += other.color.r as u32;
                sum[1] += other.color.g as u32;
                sum[2] += other.color.b as u32;
            }
        }

        if count == BIRTH_COUNT {
            let color = match rule.color {
                BirthColor::Averaged => Rgb::new(
                    (sum[0] / 3) as u8,
                    (sum[1] / 3) as u8,
                    (sum[2] / 3) as u8,
                ),
                BirthColor::Parent => cell.color,
            };
            born.push(Cell::new(near_x, near_y, color));
        }
    }
    born
}

/// Drop every cell whose position already appeared earlier in the list
pub fn dedup(cells: Vec<Cell>) -> Vec<Cell> {
    let mut unique: Vec<Cell> = Vec::with_capacity(cells.len());
    for cell in cells {
        if !unique.contains(&cell) {
            unique.push(cell);
        }
    }
    unique
}
