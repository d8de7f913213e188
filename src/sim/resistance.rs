//! Scalar resistance sampling
//!
//! "How hard is it to push through here": a weighted occupancy sum over the
//! cells whose centers fall inside a circle. Deliberately a naive O(r²) scan;
//! the probe radius is capped at 10 cells so the per-frame cost is bounded.
//! Temporal smoothing of this signal lives in [`super::haptics`].

use glam::Vec2;

use super::grid::{Grid, Material};

const SAND_WEIGHT: f32 = 0.1;
const WET_SAND_BASE: f32 = 0.1;
const WET_SAND_PER_SOAK: f32 = 0.02;
const WATER_WEIGHT: f32 = 0.02;

/// Sum of per-material weights over every in-bounds cell whose center lies
/// within `radius` of `center` (inclusive, squared-distance comparison).
pub fn resistance(grid: &Grid, center: Vec2, radius: f32) -> f32 {
    let r2 = radius * radius;
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = (center.y + radius).ceil() as i32;

    let mut total = 0.0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if !grid.in_bounds(x, y) {
                continue;
            }
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let cell = grid.get(x, y);
            total += match cell.material {
                Material::Sand => SAND_WEIGHT,
                Material::WetSand => cell.soak as f32 * WET_SAND_PER_SOAK + WET_SAND_BASE,
                Material::Water => WATER_WEIGHT,
                Material::Empty => 0.0,
            };
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::BoundaryPolicy;

    fn grid() -> Grid {
        Grid::new(20, 20, BoundaryPolicy::Solid)
    }

    #[test]
    fn test_zero_radius_on_empty_grid_is_zero() {
        let g = grid();
        assert_eq!(resistance(&g, Vec2::new(10.0, 10.0), 0.0), 0.0);
    }

    #[test]
    fn test_single_cell_weights() {
        let mut g = grid();
        let center = Vec2::new(10.0, 10.0);

        g.set(10, 10, Material::Sand, 0);
        assert!((resistance(&g, center, 0.5) - 0.1).abs() < 1e-6);

        g.set(10, 10, Material::Water, 0);
        assert!((resistance(&g, center, 0.5) - 0.02).abs() < 1e-6);

        g.set(10, 10, Material::WetSand, 2);
        assert!((resistance(&g, center, 0.5) - 0.14).abs() < 1e-6);
    }

    #[test]
    fn test_circular_cutoff_excludes_corners() {
        let mut g = grid();
        // Plus-shape at distance 1 counts; corners at sqrt(2) do not.
        for (x, y) in [(9, 10), (11, 10), (10, 9), (10, 11), (9, 9), (11, 11)] {
            g.set(x, y, Material::Sand, 0);
        }
        let r = resistance(&g, Vec2::new(10.0, 10.0), 1.0);
        assert!((r - 0.4).abs() < 1e-6, "got {r}");
    }

    #[test]
    fn test_scan_clips_to_grid_bounds() {
        let mut g = grid();
        for x in 0..20 {
            for y in 0..20 {
                g.set(x, y, Material::Sand, 0);
            }
        }
        // Query centered off-grid: only in-bounds cells contribute, and the
        // solid boundary cells are never counted.
        let near_corner = resistance(&g, Vec2::new(0.0, 0.0), 2.0);
        let interior = resistance(&g, Vec2::new(10.0, 10.0), 2.0);
        assert!(near_corner > 0.0);
        assert!(near_corner < interior);
    }
}
