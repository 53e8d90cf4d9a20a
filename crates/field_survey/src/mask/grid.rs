//! Grid geometry shared by co-registered raster layers.
//!
//! [`GridSpec`] describes a north-up grid by its lower-left origin, square cell size and
//! dimensions. Cell `(col, row)` covers `origin + (col, row) * cell_size` up to the next
//! cell; row 0 is the southernmost row.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing origins and cell sizes of two grids.
const COREGISTRATION_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSpec {
    /// Projected position of the lower-left corner.
    pub origin: DVec2,
    /// Cell size in projected units.
    pub cell_size: f64,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl GridSpec {
    pub fn new(origin: DVec2, cell_size: f64, width: usize, height: usize) -> Self {
        Self {
            origin,
            cell_size,
            width,
            height,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Projected position of the centre of cell `(col, row)`.
    pub fn cell_center(&self, col: usize, row: usize) -> DVec2 {
        self.origin + (DVec2::new(col as f64, row as f64) + 0.5) * self.cell_size
    }

    /// Converts a projected position to cell indices. Indices may lie outside the grid.
    pub fn world_to_index(&self, p: DVec2) -> (isize, isize) {
        let rel = (p - self.origin) / self.cell_size;
        (rel.x.floor() as isize, rel.y.floor() as isize)
    }

    /// Linear row-major offset of a cell, or `None` when out of bounds.
    pub fn offset(&self, col: isize, row: isize) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Whether both grids share extent and resolution.
    pub fn is_coregistered(&self, other: &GridSpec) -> bool {
        let scale = self.cell_size.abs().max(1.0);
        let tol = COREGISTRATION_TOLERANCE * scale;
        self.width == other.width
            && self.height == other.height
            && (self.cell_size - other.cell_size).abs() <= tol
            && (self.origin - other.origin).abs().max_element() <= tol
    }
}
