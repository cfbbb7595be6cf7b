// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot sink
//!
//! Writes committed results to PNG files:
//! - `mask_<timestamp>_<tick>.png` - 8-bit alpha mask at the output image size
//! - `overlay_<timestamp>_<tick>.png` - RGBA at the surface size with the mask,
//!   the bounding box outline and one box per trigger point

use super::PresentationSink;
use crate::backends::{ColorSpacePoint, FrameSize};
use crate::errors::AppResult;
use crate::pipelines::presence::{BoundingRect, TickResult, Viewport};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;
use tracing::{debug, info};

const MASK_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BOUNDS_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);
const TRIGGER_COLOR: Rgba<u8> = Rgba([230, 30, 30, 255]);

/// Render a result onto a transparent surface-sized canvas
pub fn render_overlay(result: &TickResult, marker_size: f32) -> RgbaImage {
    let surface = result.surface;
    let mut canvas = RgbaImage::new(surface.width, surface.height);
    let viewport = Viewport::new(result.mask.size(), surface);

    for (x, y) in result.mask.opaque_pixels() {
        let p = viewport.to_surface(ColorSpacePoint::new(x as f32, y as f32));
        put_clipped(&mut canvas, p.x as i64, p.y as i64, MASK_COLOR);
    }

    if !result.bounds.is_zero() {
        draw_outline(&mut canvas, &result.bounds, BOUNDS_COLOR);
    }

    for trigger in &result.triggers {
        draw_outline(&mut canvas, &trigger.marker_rect(marker_size), TRIGGER_COLOR);
    }

    canvas
}

fn put_clipped(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, color);
}

/// One-pixel rectangle outline, clipped to the canvas
fn draw_outline(canvas: &mut RgbaImage, rect: &BoundingRect, color: Rgba<u8>) {
    let x0 = rect.origin.x as i64;
    let y0 = rect.origin.y as i64;
    let x1 = x0 + rect.width as i64;
    let y1 = y0 + rect.height as i64;

    for x in x0..=x1 {
        put_clipped(canvas, x, y0, color);
        put_clipped(canvas, x, y1, color);
    }
    for y in y0..=y1 {
        put_clipped(canvas, x0, y, color);
        put_clipped(canvas, x1, y, color);
    }
}

/// Sink writing committed results as PNG files
pub struct SnapshotSink {
    output_dir: PathBuf,
    surface: FrameSize,
    marker_size: f32,
    /// Write at most one snapshot per this many ticks
    every: u64,
    last_written: Option<u64>,
    written: Vec<PathBuf>,
}

impl SnapshotSink {
    pub fn new(output_dir: PathBuf, surface: FrameSize, marker_size: f32) -> Self {
        Self {
            output_dir,
            surface,
            marker_size,
            every: 1,
            last_written: None,
            written: Vec::new(),
        }
    }

    /// Only write a snapshot when at least `every` ticks passed since the last one
    pub fn with_interval(mut self, every: u64) -> Self {
        self.every = every.max(1);
        self
    }

    /// Default output directory under the user's pictures folder
    pub fn default_dir() -> PathBuf {
        dirs::picture_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join(crate::constants::app_info::APP_DIR)
    }

    /// Paths of every file written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Write mask and overlay PNGs for a result
    pub fn write(&mut self, result: &TickResult) -> AppResult<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(&self.output_dir)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let mask_path = self
            .output_dir
            .join(format!("mask_{}_{:06}.png", timestamp, result.tick));
        let overlay_path = self
            .output_dir
            .join(format!("overlay_{}_{:06}.png", timestamp, result.tick));

        result.mask.to_alpha_image().save(&mask_path)?;
        render_overlay(result, self.marker_size).save(&overlay_path)?;

        info!(
            mask = %mask_path.display(),
            overlay = %overlay_path.display(),
            "Snapshot saved"
        );

        self.last_written = Some(result.tick);
        self.written.push(mask_path.clone());
        self.written.push(overlay_path.clone());
        Ok((mask_path, overlay_path))
    }

    fn due(&self, tick: u64) -> bool {
        self.last_written
            .is_none_or(|last| tick.saturating_sub(last) >= self.every)
    }
}

impl PresentationSink for SnapshotSink {
    fn surface_size(&self) -> FrameSize {
        self.surface
    }

    fn present(&mut self, result: &TickResult) -> AppResult<()> {
        if !result.has_data() || !result.committed {
            return Ok(());
        }
        if !self.due(result.tick) {
            debug!(tick = result.tick, "Skipping snapshot, interval not reached");
            return Ok(());
        }
        self.write(result).map(|_| ())
    }
}
