//! Sampling designs that select units from a sampling frame.
//!
//! A design receives inclusion probabilities and balancing covariates for every frame
//! unit and returns a [`Sample`] of distinct frame indices. Randomness always comes from
//! the caller's RNG, so identical inputs and seeds give identical samples.
use rand::RngCore;

use crate::balance::BalancingMatrix;
use crate::design::InclusionProbabilities;
use crate::error::Result;
use crate::events::EventSink;
use crate::frame::{SamplingFrame, SamplingUnit};

pub mod cube;
pub mod simple_random;

pub use cube::{CubeSampling, UnitOrder};
pub use simple_random::SimpleRandomSampling;

/// Trait for sampling designs.
pub trait SampleDesign {
    fn select(
        &self,
        pik: &InclusionProbabilities,
        balancing: &BalancingMatrix,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Sample>;
}

/// Distinct frame indices, sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sample {
    indices: Vec<usize>,
}

impl Sample {
    /// Build a sample from arbitrary indices; duplicates are removed.
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Indices of all `true` entries of a 0/1 indicator.
    pub fn from_indicator(indicator: &[bool]) -> Self {
        let indices = indicator
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.then_some(i))
            .collect();
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Selected units of `frame`. Indices beyond the frame are skipped.
    pub fn units<'a>(&'a self, frame: &'a SamplingFrame) -> impl Iterator<Item = &'a SamplingUnit> {
        self.indices.iter().filter_map(move |&i| frame.get(i))
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.indices
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random index in `0..bound` using a widening multiply.
#[inline]
pub(crate) fn rand_below(rng: &mut dyn RngCore, bound: usize) -> usize {
    debug_assert!(bound > 0, "bound must be > 0");
    ((rng.next_u64() as u128 * bound as u128) >> 64) as usize
}
