//! Uniform spatial grid over the x/y plane
//!
//! The grid covers a square of side `grid_size` centered at the origin,
//! split into `cell_count × cell_count` cells. Each cell holds arena
//! indices of the bodies whose position falls inside it; z is ignored.
//!
//! Bodies outside the extent are clamped into the nearest boundary cell.
//! That is a known accuracy limitation: far-away bodies only see other
//! clamped bodies. `rebuild` counts them so callers can watch for it.
//!
//! Moons are not bucketed. They ride on their planet and never enter
//! force evaluation.

use crate::simulation::states::{Body, NVec3};

/// (column, row) of a cell, both in `0..cell_count`
pub type CellCoord = (usize, usize);

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    grid_size: f64,
    cell_count: usize,
    cell_size: f64,
    cells: Vec<Vec<usize>>, // row-major, cell_count * cell_count
    clamped: usize, // bodies clamped into a boundary cell by the last rebuild
}

impl SpatialGrid {
    /// `cell_count` must be at least 1 and `grid_size` positive; callers
    /// validate config before getting here.
    pub fn new(grid_size: f64, cell_count: usize) -> Self {
        let cell_count = cell_count.max(1);
        Self {
            grid_size,
            cell_count,
            cell_size: grid_size / cell_count as f64,
            cells: vec![Vec::new(); cell_count * cell_count],
            clamped: 0,
        }
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Bodies clamped into a boundary cell since the last rebuild
    pub fn clamped(&self) -> usize {
        self.clamped
    }

    /// Clear every cell and re-bucket all non-moon bodies
    pub fn rebuild(&mut self, bodies: &[Body]) -> usize {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
        self.clamped = 0;

        for (i, body) in bodies.iter().enumerate() {
            self.insert(i, body);
        }

        if self.clamped > 0 {
            tracing::debug!(clamped = self.clamped, "bodies outside grid extent clamped into boundary cells");
        }
        self.clamped
    }

    /// Bucket a single body. Moons are skipped.
    pub fn insert(&mut self, index: usize, body: &Body) {
        if body.is_moon() {
            return;
        }
        let (coord, clamped) = self.locate(&body.x);
        if clamped {
            self.clamped += 1;
        }
        let slot = self.slot(coord);
        self.cells[slot].push(index);
    }

    /// Cell containing `position` after clamping to the grid
    pub fn cell_of(&self, position: &NVec3) -> CellCoord {
        self.locate(position).0
    }

    /// Contents of one cell
    pub fn cell(&self, coord: CellCoord) -> &[usize] {
        &self.cells[self.slot(coord)]
    }

    /// Non-empty cells with their coordinates
    pub fn occupied_cells(&self) -> Vec<(CellCoord, &[usize])> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(slot, cell)| ((slot % self.cell_count, slot / self.cell_count), cell.as_slice()))
            .collect()
    }

    /// The 3×3 block of cells around `coord`, clipped to the grid.
    /// An empty cell has no neighborhood.
    pub fn neighborhood(&self, coord: CellCoord) -> Vec<&[usize]> {
        if self.cell(coord).is_empty() {
            return Vec::new();
        }

        let (cx, cy) = (coord.0 as isize, coord.1 as isize);
        let n = self.cell_count as isize;
        let mut out = Vec::with_capacity(9);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let (x, y) = (cx + dx, cy + dy);
                if (0..n).contains(&x) && (0..n).contains(&y) {
                    out.push(self.cell((x as usize, y as usize)));
                }
            }
        }
        out
    }

    /// Number of bucketed bodies across all cells
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    fn locate(&self, position: &NVec3) -> (CellCoord, bool) {
        let (x, cx) = self.axis_index(position.x);
        let (y, cy) = self.axis_index(position.y);
        ((x, y), cx || cy)
    }

    // floor((p + size/2) / cell_size) clamped into 0..cell_count
    fn axis_index(&self, p: f64) -> (usize, bool) {
        let raw = ((p + self.grid_size / 2.0) / self.cell_size).floor();
        let max = (self.cell_count - 1) as f64;
        if raw < 0.0 || raw.is_nan() {
            (0, true)
        } else if raw > max {
            (self.cell_count - 1, true)
        } else {
            (raw as usize, false)
        }
    }

    fn slot(&self, (x, y): CellCoord) -> usize {
        y * self.cell_count + x
    }
}
