//! Balancing variables and balance diagnostics.
//!
//! A [`BalancingMatrix`] holds one row per frame unit and one named column per auxiliary
//! variable the sample must reproduce (at minimum the planar coordinates). After sampling,
//! [`balance_report`] compares Horvitz-Thompson estimated totals with the true totals.
use crate::design::InclusionProbabilities;
use crate::error::{Error, Result};
use crate::frame::SamplingFrame;
use crate::linalg;
use crate::sampling::Sample;

/// Row-major `units x variables` matrix of balancing covariates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalancingMatrix {
    rows: usize,
    names: Vec<String>,
    data: Vec<f64>,
}

impl BalancingMatrix {
    /// A matrix with `rows` units and no columns yet.
    pub fn empty(rows: usize) -> Self {
        Self {
            rows,
            names: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Coordinates `x` and `y` of every frame unit.
    ///
    /// Fails with [`Error::NonFiniteCoordinate`] on the first NaN or infinite position.
    pub fn spatial(frame: &SamplingFrame) -> Result<Self> {
        let mut data = Vec::with_capacity(frame.len() * 2);
        for p in frame.positions() {
            if !p.is_finite() {
                return Err(Error::NonFiniteCoordinate { x: p.x, y: p.y });
            }
            data.push(p.x);
            data.push(p.y);
        }
        Ok(Self {
            rows: frame.len(),
            names: vec!["x".into(), "y".into()],
            data,
        })
    }

    /// Append a named column. Values must be finite and one per unit.
    pub fn with_column(mut self, name: impl Into<String>, values: &[f64]) -> Result<Self> {
        if values.len() != self.rows {
            return Err(Error::DimensionMismatch {
                what: "balancing column",
                expected: self.rows,
                actual: values.len(),
            });
        }
        let name = name.into();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "balancing column '{name}' contains non-finite values"
            )));
        }
        let old_cols = self.names.len();
        let new_cols = old_cols + 1;
        let mut data = Vec::with_capacity(self.rows * new_cols);
        for (i, v) in values.iter().enumerate() {
            data.extend_from_slice(&self.data[i * old_cols..(i + 1) * old_cols]);
            data.push(*v);
        }
        self.data = data;
        self.names.push(name);
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Covariates of unit `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        let c = self.cols();
        &self.data[i * c..(i + 1) * c]
    }

    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        let c = self.cols();
        (0..self.rows).map(move |i| self.data[i * c + j])
    }

    /// Numerical rank of the matrix.
    pub fn rank(&self) -> usize {
        linalg::rank(&self.data, self.rows, self.cols(), linalg::PIVOT_TOLERANCE)
    }
}

/// Balance of one variable in a drawn sample.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnBalance {
    pub name: String,
    /// True population total.
    pub population_total: f64,
    /// Horvitz-Thompson estimate `sum(x_k / pi_k)` over the sample.
    pub estimated_total: f64,
}

impl ColumnBalance {
    /// `(estimate - total) / |total|`, or the absolute difference when the total is zero.
    pub fn relative_deviation(&self) -> f64 {
        let diff = self.estimated_total - self.population_total;
        if self.population_total == 0.0 {
            diff
        } else {
            diff / self.population_total.abs()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceReport {
    pub columns: Vec<ColumnBalance>,
}

impl BalanceReport {
    /// Largest absolute relative deviation across columns.
    pub fn max_abs_deviation(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.relative_deviation().abs())
            .fold(0.0, f64::max)
    }
}

/// Compare Horvitz-Thompson totals of `sample` against the population totals.
pub fn balance_report(
    matrix: &BalancingMatrix,
    pik: &InclusionProbabilities,
    sample: &Sample,
) -> Result<BalanceReport> {
    if pik.len() != matrix.rows() {
        return Err(Error::DimensionMismatch {
            what: "inclusion probabilities",
            expected: matrix.rows(),
            actual: pik.len(),
        });
    }
    if let Some(k) = sample.iter().find(|&k| k >= matrix.rows()) {
        return Err(Error::DimensionMismatch {
            what: "sample index",
            expected: matrix.rows(),
            actual: k,
        });
    }
    let probs = pik.values();
    let columns = matrix
        .names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let population_total = matrix.column(j).sum();
            let estimated_total = sample
                .iter()
                .filter(|&k| probs[k] > 0.0)
                .map(|k| matrix.row(k)[j] / probs[k])
                .sum();
            ColumnBalance {
                name: name.clone(),
                population_total,
                estimated_total,
            }
        })
        .collect();
    Ok(BalanceReport { columns })
}
