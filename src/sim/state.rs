//! Simulation state container
//!
//! Holds the grid together with the seeded tie-break RNG so that equal seeds
//! and equal operation sequences reproduce equal grids.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::{BoundaryPolicy, Grid};

/// Complete automaton state. The haptic coupling mutates `grid` too, but
/// strictly between ticks, never during one.
#[derive(Debug, Clone)]
pub struct SimState {
    pub grid: Grid,
    /// Tie-break source. Injected and seedable so tests can pin outcomes.
    pub rng: Pcg32,
    /// Seed the RNG was constructed from, kept for reproducibility reports.
    pub seed: u64,
    /// Completed automaton passes.
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(seed: u64, width: i32, height: i32, boundary: BoundaryPolicy) -> Self {
        Self {
            grid: Grid::new(width, height, boundary),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time_ticks: 0,
        }
    }
}
