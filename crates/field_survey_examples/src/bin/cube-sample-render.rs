use field_survey::prelude::*;
use field_survey_examples::{init_tracing, render_sample_to_png, RenderConfig};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Annulus of eligible cells on a 120 x 120 grid.
    let grid = GridSpec::new(DVec2::ZERO, 1.0, 120, 120);
    let center = DVec2::splat(60.0);
    let ring = Raster::from_fn(grid, |p| {
        let r = p.distance(center);
        if (25.0..55.0).contains(&r) {
            1.0
        } else {
            0.0
        }
    });
    let candidates = build_mask_with(&[&ring], |v| v[0] > 0.5)?;
    let frame = SamplingFrame::from_candidates(&candidates);
    let n = frame.len() / 100;

    let balancing = BalancingMatrix::spatial(&frame)?;
    let pik = InclusionProbabilities::equal(frame.len(), n)?;
    let cube = CubeSampling::new().sample(&pik, &balancing, &mut StdRng::seed_from_u64(6405))?;
    let srs = SimpleRandomSampling::new().draw(frame.len(), n, &mut StdRng::seed_from_u64(6405))?;

    let rc = RenderConfig::new((800, 800));
    render_sample_to_png(&frame, &cube, &rc, "cube-sample-render-cube.png")?;
    render_sample_to_png(
        &frame,
        &srs,
        &rc.clone().with_sample_color([200, 90, 90]),
        "cube-sample-render-srs.png",
    )?;
    Ok(())
}
