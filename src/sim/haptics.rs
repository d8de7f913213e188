//! Proxy/device coupling
//!
//! The classic proxy scheme: the device position is the true input point and
//! the proxy is the rendered contact point chasing it, damped by local
//! material resistance. The spring stretched between the two is the force
//! output. High resistance means a slow proxy, a long spring, a strong force.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::displace::displace;
use super::grid::Grid;
use super::resistance::resistance;
use crate::settings::HapticTuning;

/// Ring-search bound for the displacement pass in free mode.
const SEARCH_BOUND_FREE: i32 = 3;
/// Rail mode plows a whole furrow of material, so the eviction search gets
/// more room.
const SEARCH_BOUND_RAIL: i32 = 6;

/// Interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Pointer drives the device point directly. No scalar force output;
    /// the force vector is for on-screen rendering only.
    Free2D,
    /// Device travel constrained to one axis through the anchor, matching a
    /// 1-DOF physical device.
    #[default]
    Rail1D,
}

/// Active rail axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Y => Vec2::Y,
        }
    }

    pub fn component(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }
}

/// Per-frame input sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeInput {
    /// Pointer position in grid coordinates.
    pub target: Vec2,
    /// Raw device axis reading in meters; used when `positional` is false.
    pub axis_reading_m: f32,
    /// True when `target` is authoritative (pointer-driven); false when the
    /// physical device's own position reading drives the rail.
    pub positional: bool,
}

/// Damping factor in (0, 1]: the fraction of the device-proxy gap the proxy
/// closes this frame. More resistance, slower proxy.
pub fn viscosity(smoothed_resistance: f32, friction_coef: f32) -> f32 {
    1.0 / (1.0 + smoothed_resistance * friction_coef)
}

/// Coupling state. Created once at startup; mutated once per frame.
#[derive(Debug, Clone)]
pub struct HapticSystem {
    /// True input point (pointer or reconstructed device position).
    pub device_pos: Vec2,
    /// Rendered contact point, lagging behind the device.
    pub proxy_pos: Vec2,
    /// Rail reference point; changes only through `recenter`.
    pub anchor_pos: Vec2,
    pub mode: Mode,
    pub axis: Axis,
    /// Low-pass filtered resistance sample.
    pub smoothed_resistance: f32,
    /// Clamped rail reading in meters (diagnostic display).
    pub raw_input_m: f32,
    force_1d: f32,
    force_vec: Vec2,
}

impl HapticSystem {
    pub fn new(start: Vec2) -> Self {
        Self {
            device_pos: start,
            proxy_pos: start,
            anchor_pos: start,
            mode: Mode::default(),
            axis: Axis::default(),
            smoothed_resistance: 0.0,
            raw_input_m: 0.0,
            force_1d: 0.0,
            force_vec: Vec2::ZERO,
        }
    }

    /// Re-seat the rail: anchor, device, and proxy collapse onto `point` and
    /// the rail reading resets. The only way the anchor ever moves.
    pub fn recenter(&mut self, point: Vec2) {
        self.anchor_pos = point;
        self.device_pos = point;
        self.proxy_pos = point;
        self.raw_input_m = 0.0;
    }

    /// Scalar force along the active axis (newtons). Always zero in free
    /// mode; that mode renders the vector on screen but transmits nothing.
    pub fn force_1d(&self) -> f32 {
        self.force_1d
    }

    /// Full spring force vector, for rendering.
    pub fn force_vec(&self) -> Vec2 {
        self.force_vec
    }

    fn search_bound(&self) -> i32 {
        match self.mode {
            Mode::Free2D => SEARCH_BOUND_FREE,
            Mode::Rail1D => SEARCH_BOUND_RAIL,
        }
    }

    /// One coupling frame: resolve the device point, sample and smooth
    /// resistance, advance the proxy, displace intruded material, compute
    /// the spring force.
    pub fn update(&mut self, input: &ProbeInput, tuning: &HapticTuning, grid: &mut Grid) {
        match self.mode {
            Mode::Free2D => {
                self.device_pos = input.target;
                self.force_1d = 0.0;
            }
            Mode::Rail1D => {
                let reading = if input.positional {
                    self.axis.component(input.target - self.anchor_pos) / tuning.hapkit_scale
                } else {
                    input.axis_reading_m
                };
                self.raw_input_m = reading.clamp(-tuning.input_limit_m, tuning.input_limit_m);
                self.device_pos =
                    self.anchor_pos + self.axis.unit() * (self.raw_input_m * tuning.hapkit_scale);
            }
        }

        let raw = resistance(grid, self.proxy_pos, tuning.radius);
        let alpha = tuning.resistance_alpha;
        self.smoothed_resistance = self.smoothed_resistance * (1.0 - alpha) + raw * alpha;

        let damping = viscosity(self.smoothed_resistance, tuning.friction_coef);
        self.proxy_pos += (self.device_pos - self.proxy_pos) * damping;

        displace(grid, self.proxy_pos, tuning.radius, self.search_bound());

        // Inverted spring: pulls the device back toward the proxy, resisting
        // further intrusion. Deadband kills chatter at rest.
        let mut force = (self.proxy_pos - self.device_pos) * -tuning.spring_k;
        if force.length() < tuning.force_deadband {
            force = Vec2::ZERO;
        }
        self.force_vec = force;
        if self.mode == Mode::Rail1D {
            self.force_1d = self.axis.component(force);
        }
    }
}
