//! Simulation and coupling tuning
//!
//! Every live-adjustable knob lives in these structs and is handed into the
//! update calls explicitly — never held as global mutable state. Serialized
//! as JSON so a settings file survives restarts.

use serde::{Deserialize, Serialize};

use crate::consts::{
    FORCE_DEADBAND, INITIAL_HEIGHT, INITIAL_WIDTH, INPUT_LIMIT_M, RESISTANCE_ALPHA,
    TICK_INTERVAL_DEFAULT_MS,
};
use crate::sim::BoundaryPolicy;

/// Haptic coupling knobs. Documented ranges enforced by `clamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticTuning {
    /// Probe radius in cells (1-10)
    pub radius: f32,
    /// Resistance-to-damping coefficient (0.01-10)
    pub friction_coef: f32,
    /// Spring stiffness k (0.001-5)
    pub spring_k: f32,
    /// Grid cells per meter of device travel (100-2000)
    pub hapkit_scale: f32,
    /// Physical travel clamp on the rail reading (meters)
    pub input_limit_m: f32,
    /// Force magnitude below this renders as zero (newtons)
    pub force_deadband: f32,
    /// Per-frame low-pass constant for resistance smoothing (0-1)
    pub resistance_alpha: f32,
}

impl Default for HapticTuning {
    fn default() -> Self {
        Self {
            radius: 4.0,
            friction_coef: 5.0,
            spring_k: 0.5,
            hapkit_scale: 500.0,
            input_limit_m: INPUT_LIMIT_M,
            force_deadband: FORCE_DEADBAND,
            resistance_alpha: RESISTANCE_ALPHA,
        }
    }
}

impl HapticTuning {
    /// Clamp every knob to its documented range.
    pub fn clamp(&mut self) {
        self.radius = self.radius.clamp(1.0, 10.0);
        self.friction_coef = self.friction_coef.clamp(0.01, 10.0);
        self.spring_k = self.spring_k.clamp(0.001, 5.0);
        self.hapkit_scale = self.hapkit_scale.clamp(100.0, 2000.0);
        self.resistance_alpha = self.resistance_alpha.clamp(0.0, 1.0);
    }
}

/// Automaton knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimTuning {
    pub width: i32,
    pub height: i32,
    /// Automaton tick interval in milliseconds (1-200)
    pub tick_interval_ms: f32,
    pub boundary: BoundaryPolicy,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            width: INITIAL_WIDTH,
            height: INITIAL_HEIGHT,
            tick_interval_ms: TICK_INTERVAL_DEFAULT_MS,
            boundary: BoundaryPolicy::default(),
        }
    }
}

/// Largest accepted grid edge. Keeps a corrupt settings file from
/// requesting an absurd allocation; the O(r²) probe scan assumes grids in
/// this ballpark anyway.
pub const MAX_GRID_DIM: i32 = 1024;

impl SimTuning {
    pub fn clamp(&mut self) {
        self.width = self.width.clamp(1, MAX_GRID_DIM);
        self.height = self.height.clamp(1, MAX_GRID_DIM);
        self.tick_interval_ms = self.tick_interval_ms.clamp(1.0, 200.0);
    }
}

/// Everything tunable in one place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub sim: SimTuning,
    pub haptics: HapticTuning,
}

impl Settings {
    pub fn clamp(&mut self) {
        self.sim.clamp();
        self.haptics.clamp();
    }

    /// Load from a JSON file; any failure falls back to defaults.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.clamp();
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {path}: {e}; using defaults");
                    Settings::default()
                }
            },
            Err(_) => {
                log::info!("No settings at {path}, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &str) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save settings to {path}: {e}");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
