use std::collections::HashSet;

use field_survey::prelude::*;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// SplitMix64: a fixed, portable stream so pinned samples survive `rand` upgrades.
struct SplitMix64 {
    state: u64,
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

// Seed 6405 over the 100 x 100 unit lattice, 63 units, random unit order.
const REFERENCE_SAMPLE: [usize; 63] = [
    75, 76, 417, 589, 607, 672, 861, 1489, 1676, 1906, 1927, 2009, 2432, 2440, 2458, 2549, 2587,
    2591, 2707, 2726, 3368, 3394, 3640, 3873, 4024, 4124, 4202, 4259, 4291, 4358, 4712, 4962, 5507,
    5512, 5534, 5837, 6144, 6145, 6292, 6294, 6545, 6693, 6765, 6863, 6972, 7212, 7506, 7626, 7731,
    7739, 8008, 8056, 8460, 8506, 8552, 8559, 8852, 8887, 9192, 9258, 9752, 9798, 9923,
];

fn unit_grid(side: usize) -> Vec<Candidate> {
    (0..side * side)
        .map(|i| Candidate::eligible(DVec2::new((i % side) as f64, (i / side) as f64)))
        .collect()
}

fn cube_draw(frame: &SamplingFrame, n: usize, seed: u64) -> Sample {
    let pik = InclusionProbabilities::equal(frame.len(), n).expect("valid size");
    let m = BalancingMatrix::spatial(frame).expect("finite positions");
    CubeSampling::new()
        .sample(&pik, &m, &mut StdRng::seed_from_u64(seed))
        .expect("cube sample")
}

fn mean_offset(frame: &SamplingFrame, sample: &Sample) -> f64 {
    let population = frame.mean_position().expect("non-empty frame");
    let sum: DVec2 = sample.units(frame).map(|u| u.position).sum();
    let mean = sum / sample.len() as f64;
    let d = (mean - population).abs();
    (d.x + d.y) / 2.0
}

#[test]
fn reference_survey_draws_63_reproducible_locations() {
    let candidates = unit_grid(100);
    let frame = SamplingFrame::from_candidates(&candidates);
    let n = target_sample_size(frame.len(), 16.0, 0.1).unwrap();
    assert_eq!(n, 63);

    let first = cube_draw(&frame, n, 6405);
    let second = cube_draw(&frame, n, 6405);
    assert_eq!(first.len(), 63);
    assert_eq!(first, second);

    let unique: HashSet<_> = first.iter().collect();
    assert_eq!(unique.len(), 63);
}

#[test]
fn reference_survey_indices_are_pinned() {
    let frame = SamplingFrame::from_candidates(&unit_grid(100));
    let pik = InclusionProbabilities::equal(frame.len(), 63).unwrap();
    let m = BalancingMatrix::spatial(&frame).unwrap();
    let mut rng = SplitMix64 { state: 6405 };
    let sample = CubeSampling::new().sample(&pik, &m, &mut rng).unwrap();
    assert_eq!(sample.indices(), &REFERENCE_SAMPLE);
}

#[test]
fn splitmix_stream_matches_reference_output() {
    let mut rng = SplitMix64 { state: 0 };
    assert_eq!(rng.next_u64(), 0xE220_A839_7B1D_CDAF);
}

#[test]
fn runner_with_default_config_matches_direct_draw() {
    let candidates = unit_grid(100);
    let frame = SamplingFrame::from_candidates(&candidates);
    let boundaries = AdminBoundaries::new();
    let runner = SurveyRunner::try_new(SurveyConfig::default(), &boundaries).unwrap();

    let result = runner.run_spatial(&frame, &mut ()).unwrap();
    assert_eq!(result.records.len(), 63);
    assert_eq!(result.unmatched, 63);
    assert_eq!(result.sample, cube_draw(&frame, 63, 6405));

    let csv = to_csv_string(&result.records).unwrap();
    assert_eq!(csv.lines().count(), 64);
    // Unit coordinates sit in the first tile, or on the origin axes.
    for line in csv.lines().skip(1) {
        let id = line.split(',').nth(3).unwrap();
        assert!(line.starts_with("NA,NA,NA,"), "{line}");
        assert!(["E1N1", "E0N1", "E1N0", "E0N0"].contains(&id), "{line}");
    }
}

#[test]
fn cube_sample_is_better_balanced_than_simple_random() {
    let frame = SamplingFrame::from_candidates(&unit_grid(20));
    let n = 40;
    let reps = 30;

    let mut cube_total = 0.0;
    let mut srs_total = 0.0;
    for seed in 0..reps {
        let cube = cube_draw(&frame, n, seed);
        assert_eq!(cube.len(), n);
        cube_total += mean_offset(&frame, &cube);

        let srs = SimpleRandomSampling::new()
            .draw(frame.len(), n, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        srs_total += mean_offset(&frame, &srs);
    }
    let cube_avg = cube_total / reps as f64;
    let srs_avg = srs_total / reps as f64;

    // Coordinates 0..19 have sd ~5.8, so a random mean is off by ~0.7 on average.
    let sd_bound = 5.8 / (n as f64).sqrt();
    assert!(cube_avg < sd_bound, "cube {cube_avg} vs bound {sd_bound}");
    assert!(
        cube_avg < 0.5 * srs_avg,
        "cube {cube_avg} not tighter than srs {srs_avg}"
    );
}

#[test]
fn boundary_sizes_follow_the_contract() {
    let frame = SamplingFrame::from_candidates(&unit_grid(6));
    assert!(cube_draw(&frame, 0, 1).is_empty());
    assert_eq!(cube_draw(&frame, 36, 1).len(), 36);

    let err = InclusionProbabilities::equal(frame.len(), 37).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidSampleSize {
            requested: 37,
            population: 36
        }
    ));

    let empty = SamplingFrame::default();
    assert!(matches!(
        InclusionProbabilities::equal(empty.len(), 0),
        Err(Error::EmptyPopulation)
    ));
}

#[test]
fn mask_to_sample_pipeline_keeps_source_indices() {
    let grid = GridSpec::new(DVec2::new(300_000.0, 9_600_000.0), 100.0, 30, 30);
    // Cropland in the west half, everything within 1 km except the top rows.
    let land = Raster::from_fn(grid.clone(), |p| if p.x < 301_500.0 { 40.0 } else { 10.0 });
    let dist = Raster::from_fn(grid.clone(), |p| if p.y < 9_602_500.0 { 200.0 } else { 5_000.0 });

    let config = SurveyConfig::new()
        .with_population_divisor(1.0)
        .with_sample_fraction(0.05);
    let candidates = build_mask(&land, &dist, &config.eligibility_criteria()).unwrap();
    let frame = SamplingFrame::from_candidates(&candidates);
    // 15 columns x 25 rows.
    assert_eq!(frame.len(), 375);

    let boundaries = AdminBoundaries::new();
    let runner = SurveyRunner::try_new(config, &boundaries).unwrap();
    let balancing = BalancingMatrix::spatial(&frame).unwrap();
    let sample = runner.draw(&frame, &balancing, &mut ()).unwrap();
    assert_eq!(sample.len(), 19);
    for unit in sample.units(&frame) {
        let c = candidates[unit.source_index];
        assert!(c.eligible);
        assert_eq!(c.position, unit.position);
    }
}

#[test]
fn misregistered_layers_fail_before_sampling() {
    let a = Raster::filled(GridSpec::new(DVec2::ZERO, 30.0, 10, 10), 40.0);
    let b = Raster::filled(GridSpec::new(DVec2::new(15.0, 0.0), 30.0, 10, 10), 0.0);
    let err = build_mask(&a, &b, &EligibilityCriteria::new(vec![40], 100.0)).unwrap_err();
    assert!(matches!(err, Error::GridMismatch(_)));
}

#[test]
fn grid_label_reference_point() {
    let id = grid_id(DVec2::new(-12_345.0, 6_789.0), 10_000.0).unwrap();
    assert_eq!(id.to_string(), "W2N1");
}

#[test]
fn extra_balancing_column_is_respected() {
    let frame = SamplingFrame::from_candidates(&unit_grid(15));
    let slope: Vec<f64> = frame
        .positions()
        .map(|p| (p.x * 0.37 + p.y * 0.11).sin() + 2.0)
        .collect();
    let m = BalancingMatrix::spatial(&frame)
        .unwrap()
        .with_column("slope", &slope)
        .unwrap();
    let pik = InclusionProbabilities::equal(frame.len(), 30).unwrap();
    let mut sink = VecSink::new();
    let sample = CubeSampling::new()
        .select(&pik, &m, &mut StdRng::seed_from_u64(77), &mut sink)
        .unwrap();
    assert_eq!(sample.len(), 30);

    let landing_drops: Vec<_> = sink
        .as_slice()
        .iter()
        .filter_map(|e| match e {
            SamplingEvent::LandingStep { dropped, .. } => Some(dropped.as_str()),
            _ => None,
        })
        .collect();
    if let Some(first) = landing_drops.first() {
        assert_eq!(*first, "slope");
    }

    let report = balance_report(&m, &pik, &sample).unwrap();
    assert_eq!(report.columns.len(), 3);
    assert!(report.max_abs_deviation() < 0.25, "{report:?}");
}
