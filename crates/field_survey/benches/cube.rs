mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use field_survey::prelude::*;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SIDES: [usize; 4] = [25, 50, 100, 200];

/// Square frame of `side * side` units on a 30 m lattice.
fn lattice_frame(side: usize) -> SamplingFrame {
    let candidates: Vec<_> = (0..side * side)
        .map(|i| Candidate::eligible(DVec2::new((i % side) as f64 * 30.0, (i / side) as f64 * 30.0)))
        .collect();
    SamplingFrame::from_candidates(&candidates)
}

fn cube_spatial_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube/spatial");

    for &side in &SIDES {
        let frame = lattice_frame(side);
        let balancing = BalancingMatrix::spatial(&frame).expect("finite lattice");
        let n = target_sample_size(frame.len(), 16.0, 0.1).unwrap_or(1).max(1);
        let pik = InclusionProbabilities::equal(frame.len(), n).expect("valid sample size");
        group.throughput(common::units_throughput(frame.len()));

        let sampler = CubeSampling::new();
        let mut rng = StdRng::seed_from_u64(0x5EED_u64 ^ side as u64);

        group.bench_with_input(BenchmarkId::from_parameter(frame.len()), &side, |b, _| {
            b.iter(|| {
                let sample = sampler.sample(&pik, &balancing, &mut rng).expect("cube sample");
                black_box(sample.len());
            });
        });
    }

    group.finish();
}

fn cube_vs_srs_benches(c: &mut Criterion) {
    let frame = lattice_frame(100);
    let balancing = BalancingMatrix::spatial(&frame).expect("finite lattice");
    let pik = InclusionProbabilities::equal(frame.len(), 500).expect("valid sample size");

    let mut group = c.benchmark_group("cube/vs_srs");
    group.throughput(common::units_throughput(frame.len()));

    let mut rng = StdRng::seed_from_u64(6405);
    group.bench_function("cube", |b| {
        let sampler = CubeSampling::new();
        b.iter(|| {
            let sample = sampler.sample(&pik, &balancing, &mut rng).expect("cube sample");
            black_box(sample.len());
        });
    });
    group.bench_function("srs", |b| {
        let sampler = SimpleRandomSampling::new();
        b.iter(|| {
            let sample = sampler.draw(frame.len(), 500, &mut rng).expect("srs sample");
            black_box(sample.len());
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::survey_criterion();
    targets = cube_spatial_benches, cube_vs_srs_benches
}
criterion_main!(benches);
