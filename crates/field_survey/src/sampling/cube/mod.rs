//! Balanced sampling with the cube method.
//!
//! The cube method (Deville & Tillé) draws a sample whose Horvitz-Thompson estimates of
//! the balancing totals match the population totals, while respecting the given
//! first-order inclusion probabilities. It runs in two phases:
//!
//! - flight: a random walk of the probability vector inside the unit cube, constrained
//!   to the balancing subspace, until no further move keeps balance exactly
//!   (see [`flight`]);
//! - landing: the few units left are decided by dropping balancing variables one at a
//!   time, last column first (see [`landing`]).
//!
//! The inclusion-probability column is always prepended to the balancing variables, so
//! a probability vector with an integer sum yields a sample of exactly that size.
//!
//! The RNG is consumed in two places only: the seeded shuffle of the unit visiting order
//! (with [`UnitOrder::Random`]) and the up/down choice of every flight step.
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::balance::BalancingMatrix;
use crate::design::InclusionProbabilities;
use crate::error::{Error, Result};
use crate::events::{EventSink, SamplingEvent};
use crate::linalg::{self, PIVOT_TOLERANCE};
use crate::sampling::{rand_below, Sample, SampleDesign};

mod flight;
mod landing;

use flight::{fly, is_open};

/// Default distance from 0 or 1 below which a probability counts as decided.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Order in which undecided units enter the flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitOrder {
    /// Seeded random permutation of the frame.
    #[default]
    Random,
    /// Frame order.
    Input,
}

/// Cube-method sampler.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeSampling {
    /// Order in which units enter the flight and, afterwards, the landing.
    pub unit_order: UnitOrder,
    /// Probabilities within this distance of 0 or 1 are treated as decided.
    pub epsilon: f64,
}

impl Default for CubeSampling {
    fn default() -> Self {
        Self {
            unit_order: UnitOrder::Random,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl CubeSampling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit visiting order.
    pub fn with_unit_order(mut self, unit_order: UnitOrder) -> Self {
        self.unit_order = unit_order;
        self
    }

    /// Sets the decision tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon < 1e-3) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be in (0, 1e-3), got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Draws a balanced sample without observing events.
    pub fn sample(
        &self,
        pik: &InclusionProbabilities,
        balancing: &BalancingMatrix,
        rng: &mut dyn RngCore,
    ) -> Result<Sample> {
        self.select(pik, balancing, rng, &mut ())
    }
}

impl SampleDesign for CubeSampling {
    fn select(
        &self,
        pik: &InclusionProbabilities,
        balancing: &BalancingMatrix,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<Sample> {
        self.validate()?;
        let population = pik.len();
        if population == 0 {
            return Err(Error::EmptyPopulation);
        }
        if balancing.rows() != population {
            return Err(Error::DimensionMismatch {
                what: "balancing matrix rows",
                expected: population,
                actual: balancing.rows(),
            });
        }
        let target = pik.expected_size();
        if !pik.has_integer_sum() {
            warn!(
                "Inclusion probabilities sum to {:.6}; sample size will vary around {}.",
                pik.sum(),
                target
            );
            sink.send(SamplingEvent::Warning {
                context: "cube".into(),
                message: format!("non-integer probability sum {:.6}", pik.sum()),
            });
        }

        let eps = self.epsilon;
        let mut probs: Vec<f64> = pik.values().iter().map(|&p| flight::snap(p, eps)).collect();
        let mut order: Vec<usize> = (0..population).filter(|&k| is_open(probs[k], eps)).collect();

        let a = CubeMatrix::build(balancing, pik.values(), &order)?;
        info!(
            "Cube sampling {} of {} units ({} undecided, {} balancing columns).",
            target,
            population,
            order.len(),
            a.cols()
        );
        sink.send(SamplingEvent::Started {
            population,
            sample_size: target,
            balancing_columns: a.cols(),
        });

        if self.unit_order == UnitOrder::Random {
            shuffle(&mut order, rng);
        }

        let flight = fly(&a, a.cols(), &mut probs, &order, eps, rng);
        debug!(
            "Flight finished after {} steps with {} undecided units.",
            flight.steps,
            flight.remaining.len()
        );
        sink.send(SamplingEvent::FlightFinished {
            steps: flight.steps,
            undecided: flight.remaining.len(),
        });

        landing::land(&a, &mut probs, flight.remaining, eps, rng, sink);

        let indicator: Vec<bool> = probs.iter().map(|&p| p > 0.5).collect();
        let sample = Sample::from_indicator(&indicator);
        if pik.has_integer_sum() && sample.len() != target {
            warn!(
                "Cube sample has {} units, expected {}.",
                sample.len(),
                target
            );
        }
        sink.send(SamplingEvent::Finished {
            selected: sample.len(),
        });
        Ok(sample)
    }
}

/// Fisher-Yates shuffle driven by the caller's RNG.
fn shuffle(items: &mut [usize], rng: &mut dyn RngCore) {
    for i in (1..items.len()).rev() {
        let j = rand_below(rng, i + 1);
        items.swap(i, j);
    }
}

/// Flight matrix `A`: row `k` is `(pi_k, z_k) / pi_k`, so its first column is all ones.
///
/// Rows of units decided up front are left at zero and never read.
#[derive(Debug)]
pub(crate) struct CubeMatrix {
    cols: usize,
    data: Vec<f64>,
    names: Vec<String>,
}

impl CubeMatrix {
    fn build(balancing: &BalancingMatrix, pik: &[f64], open: &[usize]) -> Result<Self> {
        let cols = balancing.cols() + 1;
        let mut names = Vec::with_capacity(cols);
        names.push("inclusion_probability".to_string());
        names.extend(balancing.names().iter().cloned());

        // Rank is checked on (pi, z) over the open units; row scaling by 1/pi keeps it.
        let mut z = Vec::with_capacity(open.len() * cols);
        for &k in open {
            z.push(pik[k]);
            z.extend_from_slice(balancing.row(k));
        }
        let rank = linalg::rank(&z, open.len(), cols, PIVOT_TOLERANCE);
        if rank < cols.min(open.len()) {
            return Err(Error::DegenerateBalancingMatrix {
                columns: cols,
                rank,
            });
        }

        let mut data = vec![0.0; pik.len() * cols];
        for &k in open {
            let row = &mut data[k * cols..(k + 1) * cols];
            row[0] = 1.0;
            for (dst, src) in row[1..].iter_mut().zip(balancing.row(k)) {
                *dst = src / pik[k];
            }
        }
        Ok(Self { cols, data, names })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(cols: usize, data: Vec<f64>, names: Vec<String>) -> Self {
        debug_assert_eq!(data.len() % cols.max(1), 0);
        debug_assert_eq!(names.len(), cols);
        Self { cols, data, names }
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn row(&self, k: usize) -> &[f64] {
        &self.data[k * self.cols..(k + 1) * self.cols]
    }
}
