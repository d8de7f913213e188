//! Probe displacement: evicting material from under the proxy
//!
//! Each frame, every occupied cell inside the proxy circle is pushed radially
//! outward to the nearest empty cell just past the rim. Cells that find no
//! home stay put and are retried next frame.

use glam::{IVec2, Vec2};

use super::grid::Grid;

/// How far past the proxy rim evicted material is aimed (cells).
const EJECT_MARGIN: f32 = 1.5;

/// Below this distance from the proxy center the outward direction is
/// undefined; evict straight up.
const CENTER_EPSILON: f32 = 0.01;

/// Nearest empty cell to `target`: the target itself first, then expanding
/// square-ring perimeters out to `max_radius`. Scan order within a ring is
/// fixed (rows top to bottom, columns left to right), so results are
/// deterministic.
pub fn find_nearest_empty(grid: &Grid, target: IVec2, max_radius: i32) -> Option<IVec2> {
    if grid.open(target.x, target.y) {
        return Some(target);
    }
    for r in 1..=max_radius {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx.abs() != r && dy.abs() != r {
                    continue;
                }
                let (nx, ny) = (target.x + dx, target.y + dy);
                if grid.open(nx, ny) {
                    return Some(IVec2::new(nx, ny));
                }
            }
        }
    }
    None
}

/// One displacement pass around `proxy`. A destination claimed earlier in
/// the same pass makes the later move fail; that race is accepted and the
/// losing cell is retried next frame.
pub fn displace(grid: &mut Grid, proxy: Vec2, radius: f32, search_bound: i32) {
    let reach = radius.ceil() as i32;
    let px = proxy.x as i32;
    let py = proxy.y as i32;
    let r2 = radius * radius;

    for y in (py - reach)..=(py + reach) {
        for x in (px - reach)..=(px + reach) {
            if !grid.in_bounds(x, y) || grid.get(x, y).is_empty() {
                continue;
            }
            let offset = Vec2::new(x as f32, y as f32) - proxy;
            if offset.length_squared() > r2 {
                continue;
            }
            let dir = if offset.length() < CENTER_EPSILON {
                Vec2::NEG_Y
            } else {
                offset.normalize()
            };
            let aim = proxy + dir * (radius + EJECT_MARGIN);
            let target = IVec2::new(aim.x as i32, aim.y as i32);
            if let Some(dest) = find_nearest_empty(grid, target, search_bound) {
                grid.move_cell(x, y, dest.x, dest.y);
            }
        }
    }
}
