//! Headless demo loop
//!
//! Runs the simulation with a scripted probe path and logs material and
//! force state. A real frontend supplies pointer input and draws the grid;
//! a real device plugs in as any non-blocking `Read + Write` stream handed
//! to `DeviceLink`. This loop carries the reference frame structure: at most
//! one automaton tick per iteration (time-accumulator gated), then exactly
//! one coupling update.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use sand_haptics::settings::Settings;
use sand_haptics::sim::{HapticSystem, Material, Mode, ProbeInput, SimState, tick};

const SETTINGS_PATH: &str = "sand-haptics.json";
const FRAME_MS: f32 = 4.0;
const FRAMES: u32 = 4000;

fn main() {
    env_logger::init();

    let mut settings = Settings::load(SETTINGS_PATH);
    settings.clamp();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Simulation seed: {seed}");

    let mut state = SimState::new(
        seed,
        settings.sim.width,
        settings.sim.height,
        settings.sim.boundary,
    );
    let center = Vec2::new(
        settings.sim.width as f32 / 2.0,
        settings.sim.height as f32 / 2.0,
    );
    let mut haptics = HapticSystem::new(center);
    haptics.mode = Mode::Free2D;

    // Pour a sand dune and a splash of water onto it.
    for x in 10..50 {
        for y in 0..6 {
            state.grid.paint(x, y, Material::Sand);
        }
    }
    for x in 25..35 {
        state.grid.paint(x, 8, Material::Water);
    }
    log::info!(
        "Poured {} cells onto a {}x{} grid",
        state.grid.occupied(),
        state.grid.width(),
        state.grid.height()
    );

    let mut accumulator = 0.0f32;
    for frame in 0..FRAMES {
        accumulator += FRAME_MS;
        if accumulator >= settings.sim.tick_interval_ms {
            tick(&mut state);
            accumulator = 0.0;
        }

        // First half: free-roaming circular stir. Second half: rail mode,
        // sawing along the X axis through the settled pile.
        if frame == FRAMES / 2 {
            haptics.mode = Mode::Rail1D;
            haptics.recenter(center);
            log::info!("Switched to rail mode, anchor at {center}");
        }
        let t = frame as f32 * FRAME_MS / 1000.0;
        let target = match haptics.mode {
            Mode::Free2D => center + Vec2::new((t * 1.3).cos(), (t * 1.3).sin()) * 12.0,
            Mode::Rail1D => center + Vec2::new((t * 2.0).sin() * 20.0, 0.0),
        };
        let input = ProbeInput {
            target,
            axis_reading_m: 0.0,
            positional: true,
        };
        haptics.update(&input, &settings.haptics, &mut state.grid);

        if frame % 500 == 0 {
            log::info!(
                "frame {frame}: tick {} | occupied {} | resistance {:.2} | force {:+.3} N",
                state.time_ticks,
                state.grid.occupied(),
                haptics.smoothed_resistance,
                haptics.force_1d(),
            );
        }
    }

    log::info!(
        "Done: {} ticks, {} cells remain, proxy at {:.1}",
        state.time_ticks,
        state.grid.occupied(),
        haptics.proxy_pos
    );
    settings.save(SETTINGS_PATH);
}
