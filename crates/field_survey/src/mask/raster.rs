//! In-memory raster layer over a [`GridSpec`].
use glam::DVec2;

use super::grid::GridSpec;
use crate::error::{Error, Result};

/// A single-band raster with `f32` cells stored row-major from the southern row.
#[derive(Clone, Debug)]
pub struct Raster {
    pub grid: GridSpec,
    pub data: Vec<f32>,
}

impl Raster {
    /// Create a raster with every cell set to `fill`.
    pub fn filled(grid: GridSpec, fill: f32) -> Self {
        let len = grid.len();
        Self {
            grid,
            data: vec![fill; len],
        }
    }

    /// Wrap existing cell values, checking that they cover the grid exactly.
    pub fn from_vec(grid: GridSpec, data: Vec<f32>) -> Result<Self> {
        if data.len() != grid.len() {
            return Err(Error::DimensionMismatch {
                what: "raster cells",
                expected: grid.len(),
                actual: data.len(),
            });
        }
        Ok(Self { grid, data })
    }

    /// Build a raster by evaluating `f` at every cell centre.
    pub fn from_fn(grid: GridSpec, mut f: impl FnMut(DVec2) -> f32) -> Self {
        let mut data = Vec::with_capacity(grid.len());
        for row in 0..grid.height {
            for col in 0..grid.width {
                data.push(f(grid.cell_center(col, row)));
            }
        }
        Self { grid, data }
    }

    /// Value at cell `(col, row)`, `None` when out of bounds.
    pub fn get(&self, col: isize, row: isize) -> Option<f32> {
        self.grid.offset(col, row).map(|i| self.data[i])
    }

    /// Value of the cell containing `p`, `None` outside the grid.
    pub fn sample(&self, p: DVec2) -> Option<f32> {
        let (col, row) = self.grid.world_to_index(p);
        self.get(col, row)
    }
}
