//! Material grid storage
//!
//! Pure data plus bounds-safe accessors. Out-of-range reads resolve to a
//! synthetic boundary cell chosen by [`BoundaryPolicy`]; out-of-range writes
//! are no-ops. Movement rules live in [`super::tick`], not here.

use serde::{Deserialize, Serialize};

use crate::consts::SOAK_THRESHOLD;

/// Cell material kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Empty,
    Sand,
    WetSand,
    Water,
}

impl Material {
    pub fn is_empty(self) -> bool {
        matches!(self, Material::Empty)
    }

    /// Soak a freshly painted cell of this material starts with. Painted wet
    /// sand arrives fully saturated so it behaves like packed mud at once.
    pub fn initial_soak(self) -> u8 {
        match self {
            Material::WetSand => SOAK_THRESHOLD,
            _ => 0,
        }
    }
}

/// One grid cell. `soak` is meaningful only for `WetSand`; `Empty` cells
/// always carry `soak == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub material: Material,
    pub soak: u8,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        material: Material::Empty,
        soak: 0,
    };

    pub fn new(material: Material, soak: u8) -> Self {
        Self { material, soak }
    }

    pub fn is_empty(self) -> bool {
        self.material.is_empty()
    }
}

/// What an out-of-range read resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Off-grid reads as empty space. Material still cannot leave the grid;
    /// moves with an off-grid endpoint fail.
    Void,
    /// Off-grid reads as solid sand, so the automaton never treats the rim
    /// as fall-through space.
    #[default]
    Solid,
}

impl BoundaryPolicy {
    pub fn cell(self) -> Cell {
        match self {
            BoundaryPolicy::Void => Cell::EMPTY,
            BoundaryPolicy::Solid => Cell::new(Material::Sand, 0),
        }
    }
}

/// Fixed-size row-major cell array, addressed by integer (x, y) with
/// x in [0, width) and y in [0, height). Row 0 is the top; gravity pulls
/// toward increasing y.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    boundary: BoundaryPolicy,
}

impl Grid {
    pub fn new(width: i32, height: i32, boundary: BoundaryPolicy) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            // Widened before multiplying: i32 * i32 overflows for large
            // (but individually representable) dimensions.
            cells: vec![Cell::EMPTY; width as usize * height as usize],
            boundary,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolicy) {
        self.boundary = boundary;
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Bounds-safe read; out-of-range coordinates resolve to the boundary
    /// cell.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        if !self.in_bounds(x, y) {
            return self.boundary.cell();
        }
        self.cells[self.index(x, y)]
    }

    /// True when (x, y) is a legal movement destination: in range and empty.
    /// Unlike `get`, the boundary cell never counts as open, so material can
    /// never be moved off-grid even under the `Void` policy.
    pub fn open(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x, y)].is_empty()
    }

    /// Bounds-safe write; a no-op outside the grid.
    pub fn set(&mut self, x: i32, y: i32, material: Material, soak: u8) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = Cell::new(material, soak);
        }
    }

    /// Paint command from the interaction layer: places `material` with its
    /// default initial soak.
    pub fn paint(&mut self, x: i32, y: i32, material: Material) {
        self.set(x, y, material, material.initial_soak());
    }

    /// Relocate the cell at (x1, y1) to (x2, y2), soak included, clearing
    /// the source. Fails if either endpoint is out of range or the
    /// destination is occupied.
    pub fn move_cell(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) {
            return false;
        }
        let dst = self.index(x2, y2);
        if !self.cells[dst].is_empty() {
            return false;
        }
        let src = self.index(x1, y1);
        self.cells[dst] = self.cells[src];
        self.cells[src] = Cell::EMPTY;
        true
    }

    /// Exchange two cells unconditionally (used for buoyancy swaps). Fails
    /// only on out-of-range endpoints.
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) {
            return false;
        }
        let a = self.index(x1, y1);
        let b = self.index(x2, y2);
        self.cells.swap(a, b);
        true
    }

    /// Destructive resize: reallocates and discards all prior state. Never a
    /// resampling.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.cells = vec![Cell::EMPTY; self.width as usize * self.height as usize];
    }

    /// Clear all cells to empty without changing dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Number of non-empty cells (the simulation's conserved "mass").
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Row-major cell slice for rendering.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
