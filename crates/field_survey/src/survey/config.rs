//! Survey-level parameters.
use crate::design::target_sample_size;
use crate::error::{Error, Result};
use crate::mask::EligibilityCriteria;
use crate::sampling::{CubeSampling, UnitOrder};

/// Configuration for one survey draw.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyConfig {
    /// Caller-supplied divisor `k` in `n = round(N / k * f)`.
    pub population_divisor: f64,
    /// Sample-density fraction `f` in `n = round(N / k * f)`.
    pub sample_fraction: f64,
    /// Seed of the per-run RNG.
    pub seed: u64,
    /// Land-cover codes treated as cropland.
    pub cropland_classes: Vec<i32>,
    /// Maximum distance to the nearest built structure, in projected units.
    pub max_distance_m: f64,
    /// Tile size for grid labels, in projected units.
    pub tile_size_m: f64,
    /// EPSG code of the frame coordinates; `None` when they are already lon/lat.
    pub source_epsg: Option<u16>,
    /// Unit visiting order of the cube flight.
    pub unit_order: UnitOrder,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            population_divisor: 16.0,
            sample_fraction: 0.1,
            seed: 6405,
            cropland_classes: vec![40],
            max_distance_m: 1000.0,
            tile_size_m: 10_000.0,
            source_epsg: None,
            unit_order: UnitOrder::Random,
        }
    }
}

impl SurveyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the divisor `k`.
    pub fn with_population_divisor(mut self, population_divisor: f64) -> Self {
        self.population_divisor = population_divisor;
        self
    }

    /// Sets the fraction `f`.
    pub fn with_sample_fraction(mut self, sample_fraction: f64) -> Self {
        self.sample_fraction = sample_fraction;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the cropland classes.
    pub fn with_cropland_classes(mut self, cropland_classes: Vec<i32>) -> Self {
        self.cropland_classes = cropland_classes;
        self
    }

    /// Sets the infrastructure distance threshold.
    pub fn with_max_distance_m(mut self, max_distance_m: f64) -> Self {
        self.max_distance_m = max_distance_m;
        self
    }

    /// Sets the grid-label tile size.
    pub fn with_tile_size_m(mut self, tile_size_m: f64) -> Self {
        self.tile_size_m = tile_size_m;
        self
    }

    /// Sets the EPSG code of the frame coordinates.
    pub fn with_source_epsg(mut self, source_epsg: Option<u16>) -> Self {
        self.source_epsg = source_epsg;
        self
    }

    /// Sets the cube unit order.
    pub fn with_unit_order(mut self, unit_order: UnitOrder) -> Self {
        self.unit_order = unit_order;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        target_sample_size(0, self.population_divisor, self.sample_fraction)?;
        if !self.max_distance_m.is_finite() || self.max_distance_m < 0.0 {
            return Err(Error::InvalidConfig(
                "max_distance_m must be finite and >= 0".into(),
            ));
        }
        if !self.tile_size_m.is_finite() || self.tile_size_m <= 0.0 {
            return Err(Error::InvalidConfig(
                "tile_size_m must be finite and > 0".into(),
            ));
        }
        if self.cropland_classes.is_empty() {
            return Err(Error::InvalidConfig(
                "cropland_classes must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Sample size for a frame of `population` units.
    pub fn sample_size(&self, population: usize) -> Result<usize> {
        target_sample_size(population, self.population_divisor, self.sample_fraction)
    }

    /// Mask rule built from the cropland classes and distance threshold.
    pub fn eligibility_criteria(&self) -> EligibilityCriteria {
        EligibilityCriteria::new(self.cropland_classes.clone(), self.max_distance_m)
    }

    /// Cube sampler configured with this survey's unit order.
    pub fn sampler(&self) -> CubeSampling {
        CubeSampling::new().with_unit_order(self.unit_order)
    }
}
