//! Eligibility masks over co-registered raster layers.
//!
//! A mask turns a stack of rasters (land cover, distance to infrastructure, ...) into
//! [`Candidate`]s: one per cell, positioned at the cell centre, flagged eligible when
//! the predicate holds for that cell's values.
use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::Candidate;

pub mod grid;
pub mod raster;

pub use grid::GridSpec;
pub use raster::Raster;

/// Threshold rule combining a land-cover class set with a distance limit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EligibilityCriteria {
    /// Land-cover class codes counted as cropland.
    pub land_cover_classes: Vec<i32>,
    /// Maximum distance to the nearest built structure, in projected units.
    pub max_distance_m: f64,
}

impl EligibilityCriteria {
    pub fn new(land_cover_classes: Vec<i32>, max_distance_m: f64) -> Self {
        Self {
            land_cover_classes,
            max_distance_m,
        }
    }

    /// Evaluate the rule for one cell. NaN values never qualify.
    pub fn is_eligible(&self, land_cover: f32, distance: f32) -> bool {
        if land_cover.is_nan() || distance.is_nan() {
            return false;
        }
        let class = land_cover.round() as i32;
        self.land_cover_classes.contains(&class) && f64::from(distance) <= self.max_distance_m
    }
}

/// Build candidates from a land-cover and a distance layer.
pub fn build_mask(
    land_cover: &Raster,
    distance: &Raster,
    criteria: &EligibilityCriteria,
) -> Result<Vec<Candidate>> {
    build_mask_with(&[land_cover, distance], |values| {
        criteria.is_eligible(values[0], values[1])
    })
}

/// Build candidates from any number of co-registered layers.
///
/// `predicate` receives the cell values of every layer, in the order given.
/// Fails with [`Error::GridMismatch`] when layers differ in extent or resolution.
pub fn build_mask_with<F>(layers: &[&Raster], mut predicate: F) -> Result<Vec<Candidate>>
where
    F: FnMut(&[f32]) -> bool,
{
    let Some(first) = layers.first() else {
        return Err(Error::InvalidConfig("mask needs at least one layer".into()));
    };
    let grid = &first.grid;
    for (i, layer) in layers.iter().enumerate() {
        if !grid.is_coregistered(&layer.grid) {
            return Err(Error::GridMismatch(format!(
                "layer {i} has grid {:?}, expected {:?}",
                layer.grid, grid
            )));
        }
        if layer.data.len() != grid.len() {
            return Err(Error::DimensionMismatch {
                what: "raster cells",
                expected: grid.len(),
                actual: layer.data.len(),
            });
        }
    }

    let mut values = vec![0.0f32; layers.len()];
    let mut candidates = Vec::with_capacity(grid.len());
    for row in 0..grid.height {
        for col in 0..grid.width {
            let offset = row * grid.width + col;
            for (v, layer) in values.iter_mut().zip(layers) {
                *v = layer.data[offset];
            }
            candidates.push(Candidate {
                position: grid.cell_center(col, row),
                eligible: predicate(&values),
            });
        }
    }

    let eligible = candidates.iter().filter(|c| c.eligible).count();
    debug!(
        "Built mask over {}x{} cells: {} eligible.",
        grid.width, grid.height, eligible
    );
    Ok(candidates)
}
