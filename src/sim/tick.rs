//! Automaton engine: one `tick` advances every material cell once.
//!
//! Scan order is load-bearing: rows bottom to top, columns left to right.
//! A cell that moves down lands in a row that was already scanned, so it is
//! not re-processed within the same tick; that is what keeps fall speed at
//! one cell per tick.

use rand::Rng;
use rand_pcg::Pcg32;

use super::grid::{Grid, Material};
use super::state::SimState;
use crate::consts::SOAK_THRESHOLD;

/// Advance the grid by one full automaton pass.
pub fn tick(state: &mut SimState) {
    let SimState { grid, rng, .. } = state;
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            match grid.get(x, y).material {
                Material::Sand => update_sand(grid, rng, x, y),
                Material::WetSand => update_wet_sand(grid, x, y),
                Material::Water => update_water(grid, rng, x, y),
                Material::Empty => {}
            }
        }
    }
    state.time_ticks += 1;
}

/// Uniform left/right tie-break.
fn pick_side(rng: &mut Pcg32) -> i32 {
    if rng.random_bool(0.5) { -1 } else { 1 }
}

/// Dry sand: sinks through water, falls straight down, otherwise slides
/// diagonally. A failed vertical attempt still ends the cell's turn.
pub(crate) fn update_sand(grid: &mut Grid, rng: &mut Pcg32, x: i32, y: i32) {
    match grid.get(x, y + 1).material {
        Material::Water => {
            grid.swap(x, y, x, y + 1);
            return;
        }
        Material::Empty => {
            grid.move_cell(x, y, x, y + 1);
            return;
        }
        _ => {}
    }

    let left = grid.open(x - 1, y + 1);
    let right = grid.open(x + 1, y + 1);
    let dx = match (left, right) {
        (true, true) => pick_side(rng),
        (true, false) => -1,
        (false, true) => 1,
        (false, false) => return,
    };
    grid.move_cell(x, y, x + dx, y + 1);
}

/// Wet sand is cohesive: it falls and sinks but never slides diagonally.
pub(crate) fn update_wet_sand(grid: &mut Grid, x: i32, y: i32) {
    match grid.get(x, y + 1).material {
        Material::Empty => {
            grid.move_cell(x, y, x, y + 1);
        }
        Material::Water => {
            grid.swap(x, y, x, y + 1);
        }
        _ => {}
    }
}

/// Water: reacts with nearby sand first, then falls like sand, and failing
/// that spreads into an open side cell. The horizontal step is what makes it
/// pool instead of heap.
pub(crate) fn update_water(grid: &mut Grid, rng: &mut Pcg32, x: i32, y: i32) {
    if try_wet_sand(grid, x, y) {
        return;
    }

    if grid.open(x, y + 1) {
        grid.move_cell(x, y, x, y + 1);
        return;
    }

    let left = grid.open(x - 1, y + 1);
    let right = grid.open(x + 1, y + 1);
    match (left, right) {
        (true, true) => {
            grid.move_cell(x, y, x + pick_side(rng), y + 1);
            return;
        }
        (true, false) => {
            grid.move_cell(x, y, x - 1, y + 1);
            return;
        }
        (false, true) => {
            grid.move_cell(x, y, x + 1, y + 1);
            return;
        }
        (false, false) => {}
    }

    let l_side = grid.open(x - 1, y);
    let r_side = grid.open(x + 1, y);
    match (l_side, r_side) {
        (true, true) => {
            grid.move_cell(x, y, x + pick_side(rng), y);
        }
        (true, false) => {
            grid.move_cell(x, y, x - 1, y);
        }
        (false, true) => {
            grid.move_cell(x, y, x + 1, y);
        }
        (false, false) => {}
    }
}

/// Neighbor probe order for the wetting reaction: orthogonals, diagonals,
/// then the cell two rows straight down (standing water soaks the layer
/// beneath the surface).
const WETTING_OFFSETS: [(i32, i32); 9] = [
    (0, 1),
    (1, 0),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
    (0, 2),
];

/// Water/sand reaction at (x, y). First matching neighbor wins:
/// - dry sand soaks up the water and becomes wet (soak 1);
/// - unsaturated wet sand absorbs it (soak + 1);
/// - saturated wet sand strictly above the water sinks through it (swap).
///
/// Returns true when the water cell was consumed or relocated.
pub(crate) fn try_wet_sand(grid: &mut Grid, x: i32, y: i32) -> bool {
    for (dx, dy) in WETTING_OFFSETS {
        let (nx, ny) = (x + dx, y + dy);
        if !grid.in_bounds(nx, ny) {
            continue;
        }
        let cell = grid.get(nx, ny);
        match cell.material {
            Material::Sand => {
                grid.set(nx, ny, Material::WetSand, 1);
                grid.set(x, y, Material::Empty, 0);
                return true;
            }
            Material::WetSand if cell.soak < SOAK_THRESHOLD => {
                grid.set(nx, ny, Material::WetSand, cell.soak + 1);
                grid.set(x, y, Material::Empty, 0);
                return true;
            }
            Material::WetSand if ny < y => {
                grid.swap(x, y, nx, ny);
                return true;
            }
            _ => {}
        }
    }
    false
}
