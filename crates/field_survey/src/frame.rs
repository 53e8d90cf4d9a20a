//! Candidate population and the sampling frame built from it.
//!
//! A [`Candidate`] is one pixel (or point) of the region of interest together with its
//! eligibility flag. The [`SamplingFrame`] keeps only the eligible candidates, in input
//! order, and is what the samplers index into.
use glam::DVec2;
use mint::Vector2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A candidate survey location in a projected coordinate system.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// Planar position (projected units, usually metres).
    pub position: DVec2,
    /// Whether the location passed the eligibility mask.
    pub eligible: bool,
}

impl Candidate {
    pub fn new(position: impl Into<Vector2<f64>>, eligible: bool) -> Self {
        Self {
            position: DVec2::from(position.into()),
            eligible,
        }
    }

    pub fn eligible(position: impl Into<Vector2<f64>>) -> Self {
        Self::new(position, true)
    }
}

/// One unit of the sampling frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingUnit {
    /// Index of the originating [`Candidate`] in the candidate sequence.
    pub source_index: usize,
    /// Planar position of the unit.
    pub position: DVec2,
    /// Size measure used for unequal-probability designs. Defaults to `1.0`.
    pub size: f64,
}

/// Ordered sequence of eligible units. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct SamplingFrame {
    units: Vec<SamplingUnit>,
}

impl SamplingFrame {
    /// Build a frame from the eligible candidates, preserving their order.
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let units = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.eligible)
            .map(|(source_index, c)| SamplingUnit {
                source_index,
                position: c.position,
                size: 1.0,
            })
            .collect();
        Self { units }
    }

    /// Build a frame where every position is eligible.
    pub fn from_positions<I, P>(positions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Vector2<f64>>,
    {
        let units = positions
            .into_iter()
            .enumerate()
            .map(|(source_index, p)| SamplingUnit {
                source_index,
                position: DVec2::from(p.into()),
                size: 1.0,
            })
            .collect();
        Self { units }
    }

    /// Attach a size measure to each unit, e.g. for probability-proportional-to-size designs.
    pub fn with_sizes(mut self, sizes: &[f64]) -> Result<Self> {
        if sizes.len() != self.units.len() {
            return Err(Error::DimensionMismatch {
                what: "unit sizes",
                expected: self.units.len(),
                actual: sizes.len(),
            });
        }
        if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "unit sizes must be finite and >= 0, got {bad}"
            )));
        }
        for (unit, size) in self.units.iter_mut().zip(sizes) {
            unit.size = *size;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[SamplingUnit] {
        &self.units
    }

    pub fn get(&self, index: usize) -> Option<&SamplingUnit> {
        self.units.get(index)
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.units.iter().map(|u| u.position)
    }

    pub fn sizes(&self) -> Vec<f64> {
        self.units.iter().map(|u| u.size).collect()
    }

    /// Mean position over all units, or `None` for an empty frame.
    pub fn mean_position(&self) -> Option<DVec2> {
        if self.units.is_empty() {
            return None;
        }
        let sum: DVec2 = self.positions().sum();
        Some(sum / self.units.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_keeps_only_eligible_candidates_in_order() {
        let candidates = vec![
            Candidate::new(DVec2::new(0.0, 0.0), false),
            Candidate::new(DVec2::new(1.0, 0.0), true),
            Candidate::new(DVec2::new(2.0, 0.0), false),
            Candidate::new(DVec2::new(3.0, 0.0), true),
        ];
        let frame = SamplingFrame::from_candidates(&candidates);
        assert_eq!(frame.len(), 2);
        let sources: Vec<_> = frame.units().iter().map(|u| u.source_index).collect();
        assert_eq!(sources, vec![1, 3]);
        assert_eq!(frame.units()[1].position, DVec2::new(3.0, 0.0));
    }

    #[test]
    fn sizes_must_match_frame_length() {
        let frame = SamplingFrame::from_positions([DVec2::ZERO, DVec2::ONE]);
        let err = frame.clone().with_sizes(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert!(frame.clone().with_sizes(&[1.0, -2.0]).is_err());
        let sized = frame.with_sizes(&[2.0, 3.0]).unwrap();
        assert_eq!(sized.sizes(), vec![2.0, 3.0]);
    }

    #[test]
    fn mean_position_of_square_corners_is_center() {
        let frame = SamplingFrame::from_positions([
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 2.0),
        ]);
        assert_eq!(frame.mean_position(), Some(DVec2::new(1.0, 1.0)));
        assert_eq!(SamplingFrame::default().mean_position(), None);
    }
}
