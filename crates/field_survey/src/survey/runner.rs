//! End-to-end survey draw: sample size, balanced sample, and one record per location.
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::balance::BalancingMatrix;
use crate::design::InclusionProbabilities;
use crate::error::{Error, Result};
use crate::events::{EventSink, SamplingEvent};
use crate::frame::SamplingFrame;
use crate::sampling::{Sample, SampleDesign};
use crate::survey::admin::{AdminBoundaries, RegionMatch};
use crate::survey::config::SurveyConfig;
use crate::survey::grid_id::grid_id;
use crate::survey::projection::LonLatProjector;

/// One sampled survey location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyRecord {
    pub region: String,
    pub district: String,
    pub ward: String,
    pub grid_id: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Index of the originating candidate.
    pub source_index: usize,
}

/// Result of a survey draw.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct SurveyResult {
    /// Selected frame indices.
    pub sample: Sample,
    /// Records in frame order.
    pub records: Vec<SurveyRecord>,
    /// Records whose location fell outside every administrative region.
    pub unmatched: usize,
}

pub struct SurveyRunner<'a> {
    config: SurveyConfig,
    boundaries: &'a AdminBoundaries,
    projector: LonLatProjector,
}

impl<'a> SurveyRunner<'a> {
    /// Validates `config` and resolves its `source_epsg` into a lon/lat projector.
    pub fn try_new(config: SurveyConfig, boundaries: &'a AdminBoundaries) -> Result<Self> {
        config.validate()?;
        let projector = LonLatProjector::from_optional_epsg(config.source_epsg)?;
        Ok(Self {
            config,
            boundaries,
            projector,
        })
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    pub fn boundaries(&self) -> &AdminBoundaries {
        self.boundaries
    }

    pub fn projector(&self) -> &LonLatProjector {
        &self.projector
    }

    /// Draws the balanced sample only. The RNG is seeded fresh from the config.
    pub fn draw(
        &self,
        frame: &SamplingFrame,
        balancing: &BalancingMatrix,
        sink: &mut dyn EventSink,
    ) -> Result<Sample> {
        if frame.is_empty() {
            return Err(Error::EmptyPopulation);
        }
        let n = self.config.sample_size(frame.len())?;
        info!(
            "Drawing {} of {} eligible locations (k = {}, f = {}, seed = {}).",
            n,
            frame.len(),
            self.config.population_divisor,
            self.config.sample_fraction,
            self.config.seed
        );
        let pik = InclusionProbabilities::equal(frame.len(), n)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.config.sampler().select(&pik, balancing, &mut rng, sink)
    }

    /// Draws the sample balanced on `balancing` and builds its records.
    pub fn run(
        &self,
        frame: &SamplingFrame,
        balancing: &BalancingMatrix,
        sink: &mut dyn EventSink,
    ) -> Result<SurveyResult> {
        let sample = self.draw(frame, balancing, sink)?;
        let mut records = Vec::with_capacity(sample.len());
        let mut unmatched = 0;
        for unit in sample.units(frame) {
            let (record, matched) = self.record_for(unit.position, unit.source_index, sink)?;
            if !matched {
                unmatched += 1;
            }
            records.push(record);
        }
        if unmatched > 0 {
            warn!("{unmatched} sampled locations fall outside every administrative region.");
        }
        Ok(SurveyResult {
            sample,
            records,
            unmatched,
        })
    }

    /// Draws a sample balanced on the planar coordinates only.
    pub fn run_spatial(
        &self,
        frame: &SamplingFrame,
        sink: &mut dyn EventSink,
    ) -> Result<SurveyResult> {
        self.run(frame, &BalancingMatrix::spatial(frame)?, sink)
    }

    fn record_for(
        &self,
        position: DVec2,
        source_index: usize,
        sink: &mut dyn EventSink,
    ) -> Result<(SurveyRecord, bool)> {
        let region = self.boundaries.locate(position);
        if !region.is_matched() {
            sink.send(SamplingEvent::Warning {
                context: format!("record:{source_index}"),
                message: format!(
                    "location ({}, {}) is outside every administrative region",
                    position.x, position.y
                ),
            });
        }
        let names = region.names_or_placeholder();
        let tile = grid_id(position, self.config.tile_size_m)?;
        let lon_lat = self.projector.to_lon_lat(position)?;
        Ok((
            SurveyRecord {
                region: names.region,
                district: names.district,
                ward: names.ward,
                grid_id: tile.to_string(),
                longitude: lon_lat.x,
                latitude: lon_lat.y,
                source_index,
            },
            matches!(region, RegionMatch::Matched(_)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::events::VecSink;
    use crate::frame::Candidate;
    use crate::survey::admin::{AdminNames, AdminRegion, UNMATCHED_PLACEHOLDER};

    fn frame(side: usize) -> SamplingFrame {
        let candidates: Vec<_> = (0..side * side)
            .map(|i| Candidate::eligible(DVec2::new((i % side) as f64, (i / side) as f64)))
            .collect();
        SamplingFrame::from_candidates(&candidates)
    }

    fn west_half() -> AdminBoundaries {
        AdminBoundaries::new().with_region(AdminRegion::new(
            AdminNames::new("R", "D", "W"),
            polygon![
                (x: -0.5, y: -0.5),
                (x: 9.5, y: -0.5),
                (x: 9.5, y: 20.0),
                (x: -0.5, y: 20.0),
                (x: -0.5, y: -0.5),
            ],
        ))
    }

    #[test]
    fn run_builds_one_record_per_sampled_unit() {
        let boundaries = west_half();
        let config = SurveyConfig::new()
            .with_population_divisor(1.0)
            .with_sample_fraction(0.1)
            .with_tile_size_m(5.0);
        let runner = SurveyRunner::try_new(config, &boundaries).unwrap();

        let frame = frame(20);
        let mut sink = VecSink::new();
        let result = runner.run_spatial(&frame, &mut sink).unwrap();
        assert_eq!(result.sample.len(), 40);
        assert_eq!(result.records.len(), 40);

        let mut unmatched = 0;
        for r in &result.records {
            let x = r.longitude;
            if x <= 9.5 {
                assert_eq!(r.region, "R");
            } else {
                assert_eq!(r.region, UNMATCHED_PLACEHOLDER);
                unmatched += 1;
            }
            assert!(r.grid_id.starts_with('E'));
        }
        assert_eq!(result.unmatched, unmatched);
        let warnings = sink
            .as_slice()
            .iter()
            .filter(|e| matches!(e, SamplingEvent::Warning { .. }))
            .count();
        assert_eq!(warnings, unmatched);
    }

    #[test]
    fn same_config_reproduces_records() {
        let boundaries = west_half();
        let runner =
            SurveyRunner::try_new(SurveyConfig::new().with_population_divisor(2.0), &boundaries)
                .unwrap();
        let frame = frame(12);
        let a = runner.run_spatial(&frame, &mut ()).unwrap();
        let b = runner.run_spatial(&frame, &mut ()).unwrap();
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn empty_frame_is_rejected() {
        let boundaries = AdminBoundaries::new();
        let runner = SurveyRunner::try_new(SurveyConfig::default(), &boundaries).unwrap();
        assert!(matches!(
            runner.run_spatial(&SamplingFrame::default(), &mut ()),
            Err(Error::EmptyPopulation)
        ));
    }

    #[test]
    fn invalid_config_fails_construction() {
        let boundaries = AdminBoundaries::new();
        let config = SurveyConfig::new().with_tile_size_m(-1.0);
        assert!(SurveyRunner::try_new(config, &boundaries).is_err());
    }

    #[test]
    fn records_are_projected_with_the_configured_epsg() {
        // One UTM 36S unit at the zone's false origin: 33E on the equator.
        let boundaries = AdminBoundaries::new();
        let config = SurveyConfig::new()
            .with_population_divisor(1.0)
            .with_sample_fraction(1.0)
            .with_source_epsg(Some(32736));
        let runner = SurveyRunner::try_new(config, &boundaries).unwrap();
        assert_eq!(runner.projector().source_epsg(), Some(32736));

        let frame = SamplingFrame::from_positions([DVec2::new(500_000.0, 10_000_000.0)]);
        let result = runner
            .run(&frame, &BalancingMatrix::empty(1), &mut ())
            .unwrap();
        assert_eq!(result.records.len(), 1);
        assert!((result.records[0].longitude - 33.0).abs() < 1e-6);
        assert!(result.records[0].latitude.abs() < 1e-6);
    }

    #[test]
    fn unknown_epsg_fails_construction() {
        let boundaries = AdminBoundaries::new();
        let config = SurveyConfig::new().with_source_epsg(Some(1));
        assert!(matches!(
            SurveyRunner::try_new(config, &boundaries),
            Err(Error::Projection(_))
        ));
    }
}
