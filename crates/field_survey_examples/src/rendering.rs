//! PNG rendering of a sampling frame and the units drawn from it.
use std::path::Path;

use field_survey::prelude::*;
use glam::DVec2;
use image::{Rgb, RgbImage};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Installs a stdout subscriber at INFO. Safe to call more than once.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub frame_color: [u8; 3],
    pub sample_color: [u8; 3],
    /// Radius of a sampled unit's marker, in pixels.
    pub sample_radius: i32,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [24, 26, 30],
            frame_color: [70, 110, 70],
            sample_color: [240, 200, 60],
            sample_radius: 4,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_sample_color(mut self, color: [u8; 3]) -> Self {
        self.sample_color = color;
        self
    }
}

/// Draws every frame unit as a dot and every sampled unit as a filled disk.
pub fn render_sample_to_png(
    frame: &SamplingFrame,
    sample: &Sample,
    config: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let Some((min, max)) = bounds(frame) else {
        img.save(out_path.as_ref())?;
        return Ok(());
    };
    let extent = (max - min).max(DVec2::splat(1e-9));
    let to_pixel = |p: DVec2| -> (i32, i32) {
        let t = (p - min) / extent;
        let x = (t.x * (w.saturating_sub(1)) as f64).round() as i32;
        // Image rows grow downwards.
        let y = ((1.0 - t.y) * (h.saturating_sub(1)) as f64).round() as i32;
        (x, y)
    };

    for p in frame.positions() {
        let (x, y) = to_pixel(p);
        put(&mut img, x, y, config.frame_color);
    }
    for unit in sample.units(frame) {
        let (cx, cy) = to_pixel(unit.position);
        let r = config.sample_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    put(&mut img, cx + dx, cy + dy, config.sample_color);
                }
            }
        }
    }

    img.save(out_path.as_ref())?;
    info!(
        "Rendered {} of {} units to {}.",
        sample.len(),
        frame.len(),
        out_path.as_ref().display()
    );
    Ok(())
}

fn bounds(frame: &SamplingFrame) -> Option<(DVec2, DVec2)> {
    let mut it = frame.positions();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}
