use field_survey::prelude::*;
use field_survey_examples::init_tracing;
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

const SIDE: usize = 40;
const SAMPLE: usize = 80;
const REPLICATES: u64 = 200;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let candidates: Vec<_> = (0..SIDE * SIDE)
        .map(|i| Candidate::eligible(DVec2::new((i % SIDE) as f64, (i / SIDE) as f64)))
        .collect();
    let frame = SamplingFrame::from_candidates(&candidates);
    let balancing = BalancingMatrix::spatial(&frame)?;
    let pik = InclusionProbabilities::equal(frame.len(), SAMPLE)?;

    let cube = CubeSampling::new();
    let srs = SimpleRandomSampling::new();
    let (mut cube_dev, mut srs_dev) = (0.0, 0.0);
    for seed in 0..REPLICATES {
        let s = cube.sample(&pik, &balancing, &mut StdRng::seed_from_u64(seed))?;
        cube_dev += balance_report(&balancing, &pik, &s)?.max_abs_deviation();

        let s = srs.draw(frame.len(), SAMPLE, &mut StdRng::seed_from_u64(seed))?;
        srs_dev += balance_report(&balancing, &pik, &s)?.max_abs_deviation();
    }

    let n = REPLICATES as f64;
    info!("Mean worst-column deviation over {REPLICATES} draws of {SAMPLE}/{}:", frame.len());
    info!("  cube: {:.5}", cube_dev / n);
    info!("  srs:  {:.5}", srs_dev / n);
    Ok(())
}
