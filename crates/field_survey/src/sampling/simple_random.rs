//! Simple random sampling without replacement.
use rand::RngCore;
use tracing::debug;

use crate::balance::BalancingMatrix;
use crate::design::InclusionProbabilities;
use crate::error::{Error, Result};
use crate::events::{EventSink, SamplingEvent};
use crate::sampling::{rand_below, Sample, SampleDesign};

/// Equal-probability draw of `round(sum(pi))` distinct units, ignoring covariates.
///
/// Serves as the unbalanced baseline against [`crate::sampling::CubeSampling`].
#[derive(Debug, Clone, Default)]
pub struct SimpleRandomSampling;

impl SimpleRandomSampling {
    pub fn new() -> Self {
        Self
    }

    /// Draw `n` of `population` indices with a partial Fisher-Yates shuffle.
    pub fn draw(&self, population: usize, n: usize, rng: &mut dyn RngCore) -> Result<Sample> {
        if population == 0 {
            return Err(Error::EmptyPopulation);
        }
        if n > population {
            return Err(Error::InvalidSampleSize {
                requested: n,
                population,
            });
        }
        let mut pool: Vec<usize> = (0..population).collect();
        for i in 0..n {
            let j = i + rand_below(rng, population - i);
            pool.swap(i, j);
        }
        pool.truncate(n);
        Ok(Sample::from_indices(pool))
    }
}

impl SampleDesign for SimpleRandomSampling {
    fn select(
        &self,
        pik: &InclusionProbabilities,
        _balancing: &BalancingMatrix,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Sample> {
        let n = pik.expected_size();
        debug!("Simple random sampling of {} from {}.", n, pik.len());
        let sample = self.draw(pik.len(), n, rng)?;
        sink.send(SamplingEvent::Finished {
            selected: sample.len(),
        });
        Ok(sample)
    }
}
