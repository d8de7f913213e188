//! Sand Haptics - a falling-sand material simulation you can feel
//!
//! Core modules:
//! - `sim`: Deterministic material simulation (grid, automaton, probe coupling)
//! - `device`: Haptic device transport (line protocol over a byte stream)
//! - `settings`: Live-tunable simulation and coupling parameters

pub mod device;
pub mod settings;
pub mod sim;

pub use settings::{HapticTuning, Settings, SimTuning};

/// Simulation constants
pub mod consts {
    /// Default grid dimensions (cells)
    pub const INITIAL_WIDTH: i32 = 60;
    pub const INITIAL_HEIGHT: i32 = 60;

    /// Saturation cap for wet sand; at this soak a cell absorbs no more water
    pub const SOAK_THRESHOLD: u8 = 2;

    /// Default automaton tick interval (milliseconds)
    pub const TICK_INTERVAL_DEFAULT_MS: f32 = 16.0;

    /// Per-frame low-pass constant for resistance smoothing
    pub const RESISTANCE_ALPHA: f32 = 0.2;

    /// Force output below this magnitude renders as zero (newtons)
    pub const FORCE_DEADBAND: f32 = 0.025;

    /// Physical travel limit of the 1-DOF device arm (meters)
    pub const INPUT_LIMIT_M: f32 = 0.08;

    /// Maximum transport reads drained per frame so a chatty or wedged
    /// device cannot stall the simulation loop
    pub const MAX_READS_PER_FRAME: u32 = 50;
}
