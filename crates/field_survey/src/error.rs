//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid sample sizes, degenerate balancing data, raster co-registration failures,
//! coordinate problems, configuration, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sample size: requested {requested} from a population of {population}")]
    InvalidSampleSize { requested: usize, population: usize },

    #[error("sampling frame is empty")]
    EmptyPopulation,

    #[error("balancing matrix is degenerate: {columns} columns but rank {rank}")]
    DegenerateBalancingMatrix { columns: usize, rank: usize },

    #[error("raster layers are not co-registered: {0}")]
    GridMismatch(String),

    #[error("point ({x}, {y}) lies outside every administrative region")]
    UnmatchedRegion { x: f64, y: f64 },

    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("{what}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("projection error: {0}")]
    Projection(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
