//! Sample-size policy and first-order inclusion probabilities.
//!
//! The sample size is derived from the frame size with [`target_sample_size`]; the
//! probabilities themselves are built by [`InclusionProbabilities`], either equal
//! (`n / N` for every unit) or proportional to a size measure with capping at one.
use tracing::warn;

use crate::error::{Error, Result};

/// Tolerance on `sum(pi) == n` accepted by the samplers.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Sample size `round(population / divisor * fraction)`.
///
/// The operations run in exactly that order in `f64`, and halves round away from zero,
/// so a 10 000 unit frame with divisor 16 and fraction 0.1 yields 63.
pub fn target_sample_size(population: usize, divisor: f64, fraction: f64) -> Result<usize> {
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "population divisor must be finite and > 0, got {divisor}"
        )));
    }
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidConfig(format!(
            "sample fraction must be in [0, 1], got {fraction}"
        )));
    }
    Ok((population as f64 / divisor * fraction).round() as usize)
}

/// First-order inclusion probabilities, one per frame unit, each in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct InclusionProbabilities {
    values: Vec<f64>,
}

impl InclusionProbabilities {
    /// Equal-probability design: every unit gets `n / N`.
    pub fn equal(population: usize, n: usize) -> Result<Self> {
        if population == 0 {
            return Err(Error::EmptyPopulation);
        }
        if n > population {
            return Err(Error::InvalidSampleSize {
                requested: n,
                population,
            });
        }
        let p = n as f64 / population as f64;
        Ok(Self {
            values: vec![p; population],
        })
    }

    /// Probabilities proportional to `sizes`, summing to `n`.
    ///
    /// Units whose share would exceed one are fixed at one and the remaining budget is
    /// redistributed over the others until no value exceeds one.
    pub fn proportional_to_size(sizes: &[f64], n: usize) -> Result<Self> {
        let population = sizes.len();
        if population == 0 {
            return Err(Error::EmptyPopulation);
        }
        if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "size measures must be finite and >= 0, got {bad}"
            )));
        }
        let positive = sizes.iter().filter(|s| **s > 0.0).count();
        if n > positive {
            return Err(Error::InvalidSampleSize {
                requested: n,
                population: positive,
            });
        }

        let mut values = vec![0.0; population];
        let mut capped = vec![false; population];
        loop {
            let remaining = n as f64 - capped.iter().filter(|c| **c).count() as f64;
            let open_total: f64 = sizes
                .iter()
                .zip(&capped)
                .filter(|(_, c)| !**c)
                .map(|(s, _)| *s)
                .sum();
            let mut newly_capped = false;
            for ((v, s), c) in values.iter_mut().zip(sizes).zip(capped.iter_mut()) {
                if *c {
                    *v = 1.0;
                    continue;
                }
                *v = if open_total > 0.0 {
                    remaining * s / open_total
                } else {
                    0.0
                };
                if *v >= 1.0 {
                    *v = 1.0;
                    *c = true;
                    newly_capped = true;
                }
            }
            if !newly_capped {
                break;
            }
        }
        Ok(Self { values })
    }

    /// Use caller-supplied probabilities. Values outside `[0, 1]` are clipped.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyPopulation);
        }
        if values.iter().any(|v| v.is_nan()) {
            return Err(Error::InvalidConfig(
                "inclusion probabilities must not be NaN".into(),
            ));
        }
        let mut values = values;
        let mut clipped = 0usize;
        for v in values.iter_mut() {
            if !(0.0..=1.0).contains(v) {
                *v = v.clamp(0.0, 1.0);
                clipped += 1;
            }
        }
        if clipped > 0 {
            warn!("Clipped {clipped} inclusion probabilities to [0, 1].");
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Expected sample size, `round(sum(pi))`.
    pub fn expected_size(&self) -> usize {
        self.sum().round() as usize
    }

    /// Whether the probabilities sum to a whole number within [`PROBABILITY_SUM_TOLERANCE`].
    pub fn has_integer_sum(&self) -> bool {
        let s = self.sum();
        (s - s.round()).abs() <= PROBABILITY_SUM_TOLERANCE
    }
}
