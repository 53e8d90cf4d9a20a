use field_survey::prelude::*;
use field_survey_examples::{init_tracing, render_sample_to_png, RenderConfig};
use geo::polygon;
use glam::DVec2;
use tracing::info;

// 30 km x 30 km study area in UTM zone 36S, 100 m cells.
const ORIGIN: DVec2 = DVec2::new(700_000.0, 9_600_000.0);
const CELL: f64 = 100.0;
const SIDE: usize = 300;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let grid = GridSpec::new(ORIGIN, CELL, SIDE, SIDE);
    let land_cover = Raster::from_fn(grid.clone(), |p| {
        let t = p - ORIGIN;
        // Cropland patches, everything else shrubland.
        if (t.x * 7.0e-4).sin() * (t.y * 5.0e-4).cos() > -0.2 {
            40.0
        } else {
            20.0
        }
    });
    // Villages on a 5 km lattice; distance to the nearest one.
    let distance = Raster::from_fn(grid, |p| {
        let t = p - ORIGIN;
        let dx = (t.x.rem_euclid(5_000.0) - 2_500.0).abs();
        let dy = (t.y.rem_euclid(5_000.0) - 2_500.0).abs();
        dx.hypot(dy) as f32
    });

    let config = SurveyConfig::new().with_source_epsg(Some(32736));
    let candidates = build_mask(&land_cover, &distance, &config.eligibility_criteria())?;
    let frame = SamplingFrame::from_candidates(&candidates);
    info!("{} of {} cells are eligible.", frame.len(), candidates.len());

    let boundaries = wards();
    let runner = SurveyRunner::try_new(config, &boundaries)?;

    let mut sink = FnSink::new(|event: SamplingEvent| {
        if let SamplingEvent::Warning { context, message } = event {
            info!("{context}: {message}");
        }
    });
    let result = runner.run_spatial(&frame, &mut sink)?;

    let report = balance_report(
        &BalancingMatrix::spatial(&frame)?,
        &InclusionProbabilities::equal(frame.len(), result.sample.len())?,
        &result.sample,
    )?;
    for c in &report.columns {
        info!(
            "Balance on {}: total {:.1}, estimate {:.1} ({:+.4}%).",
            c.name,
            c.population_total,
            c.estimated_total,
            c.relative_deviation() * 100.0
        );
    }

    write_csv_file("survey-end-to-end.csv", &result.records)?;
    render_sample_to_png(
        &frame,
        &result.sample,
        &RenderConfig::new((900, 900)),
        "survey-end-to-end.png",
    )?;
    Ok(())
}

/// Two wards splitting the study area east/west, one district.
fn wards() -> AdminBoundaries {
    let (x0, y0) = (ORIGIN.x, ORIGIN.y);
    let mid = x0 + 15_000.0;
    let (x1, y1) = (x0 + 30_000.0, y0 + 30_000.0);
    AdminBoundaries::new()
        .with_region(AdminRegion::new(
            AdminNames::new("Arusha", "Karatu", "Mbulumbulu"),
            polygon![(x: x0, y: y0), (x: mid, y: y0), (x: mid, y: y1), (x: x0, y: y1), (x: x0, y: y0)],
        ))
        .with_region(AdminRegion::new(
            AdminNames::new("Arusha", "Karatu", "Rhotia"),
            polygon![(x: mid, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: mid, y: y1), (x: mid, y: y0)],
        ))
}
