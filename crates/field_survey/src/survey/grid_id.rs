//! Tile labels for field logistics.
//!
//! A [`GridId`] names the tile containing a projected position: a quadrant letter per
//! axis (`E`/`W` from the sign of x, `N`/`S` from the sign of y) followed by
//! `ceil(|coordinate| / tile_size)`. Zero counts as east/north.
use std::fmt;

use glam::DVec2;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridId {
    pub east: bool,
    pub north: bool,
    /// Tile index along x, counted away from the origin.
    pub col: u64,
    /// Tile index along y, counted away from the origin.
    pub row: u64,
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.east { 'E' } else { 'W' },
            self.col,
            if self.north { 'N' } else { 'S' },
            self.row
        )
    }
}

/// Computes the tile label of `position` for square tiles of `tile_size`.
pub fn grid_id(position: DVec2, tile_size: f64) -> Result<GridId> {
    if !position.is_finite() {
        return Err(Error::NonFiniteCoordinate {
            x: position.x,
            y: position.y,
        });
    }
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "tile size must be finite and > 0, got {tile_size}"
        )));
    }
    Ok(GridId {
        east: position.x >= 0.0,
        north: position.y >= 0.0,
        col: (position.x.abs() / tile_size).ceil() as u64,
        row: (position.y.abs() / tile_size).ceil() as u64,
    })
}
