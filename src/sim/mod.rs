//! Deterministic simulation module
//!
//! All material and coupling logic lives here. This module must be pure and
//! deterministic:
//! - Fixed scan order (rows bottom to top, columns left to right)
//! - Seeded RNG only; every tie-break draws from `SimState::rng`
//! - No rendering, transport, or platform dependencies
//!
//! Sequencing contract: at most one `tick` per loop iteration, followed by
//! exactly one `HapticSystem::update` (which runs the displacement pass).
//! The two never interleave.

pub mod displace;
pub mod grid;
pub mod haptics;
pub mod resistance;
pub mod state;
pub mod tick;

pub use displace::{displace, find_nearest_empty};
pub use grid::{BoundaryPolicy, Cell, Grid, Material};
pub use haptics::{Axis, HapticSystem, Mode, ProbeInput, viscosity};
pub use resistance::resistance;
pub use state::SimState;
pub use tick::tick;
