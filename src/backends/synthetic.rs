// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic depth source
//!
//! Renders a flat background wall with a round blob in front of it that sweeps
//! horizontally across the grid, one step per frame. Useful for demos and tests
//! without a sensor attached.

use super::types::{DepthFrame, FrameSize};
use super::FrameSource;
use crate::constants::synthetic;
use crate::errors::{SourceError, SourceResult};
use tracing::debug;

/// Synthetic scene parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticScene {
    /// Background wall distance (millimeters)
    pub wall_mm: u16,
    /// Blob distance (millimeters), `None` renders the wall only
    pub blob_mm: Option<u16>,
    /// Blob radius (depth-grid pixels)
    pub blob_radius: u32,
    /// Horizontal blob travel per frame (depth-grid pixels)
    pub blob_step: u32,
}

impl Default for SyntheticScene {
    fn default() -> Self {
        Self {
            wall_mm: synthetic::WALL_MM,
            blob_mm: Some(synthetic::BLOB_MM),
            blob_radius: synthetic::BLOB_RADIUS,
            blob_step: synthetic::BLOB_STEP,
        }
    }
}

/// Frame source producing a generated scene
pub struct SyntheticSource {
    size: FrameSize,
    scene: SyntheticScene,
    frame_index: u64,
    available: bool,
}

impl SyntheticSource {
    pub fn new(size: FrameSize, scene: SyntheticScene) -> Self {
        Self {
            size,
            scene,
            frame_index: 0,
            available: true,
        }
    }

    /// Simulate the sensor being unplugged or not yet initialized
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Blob center for a given frame index (depth-grid pixels)
    pub fn blob_center(&self, frame_index: u64) -> (u32, u32) {
        let width = self.size.width.max(1) as u64;
        let x = (frame_index * self.scene.blob_step as u64) % width;
        (x as u32, self.size.height / 2)
    }

    fn render(&self, frame_index: u64) -> Vec<u16> {
        let mut samples = vec![self.scene.wall_mm; self.size.area()];

        let Some(blob_mm) = self.scene.blob_mm else {
            return samples;
        };

        let (cx, cy) = self.blob_center(frame_index);
        let r = self.scene.blob_radius as i64;
        let r2 = r * r;
        let width = self.size.width as i64;
        let height = self.size.height as i64;

        for dy in -r..=r {
            let y = cy as i64 + dy;
            if y < 0 || y >= height {
                continue;
            }
            for dx in -r..=r {
                let x = cx as i64 + dx;
                if x < 0 || x >= width || dx * dx + dy * dy > r2 {
                    continue;
                }
                samples[(y * width + x) as usize] = blob_mm;
            }
        }
        samples
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(
            FrameSize::new(crate::constants::DEPTH_WIDTH, crate::constants::DEPTH_HEIGHT),
            SyntheticScene::default(),
        )
    }
}

impl FrameSource for SyntheticSource {
    fn depth_samples(&mut self) -> SourceResult<DepthFrame> {
        if !self.available {
            return Err(SourceError::Unavailable);
        }

        let frame_index = self.frame_index;
        self.frame_index += 1;
        debug!(frame_index, center = ?self.blob_center(frame_index), "Rendering synthetic frame");

        DepthFrame::new(self.size, self.render(frame_index))
    }

    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_only() {
        let scene = SyntheticScene {
            blob_mm: None,
            ..SyntheticScene::default()
        };
        let mut source = SyntheticSource::new(FrameSize::new(16, 8), scene);
        let frame = source.depth_samples().unwrap();
        assert!(frame.samples().iter().all(|&d| d == scene.wall_mm));
    }

    #[test]
    fn test_blob_moves_each_frame() {
        let mut source = SyntheticSource::default();
        let first = source.depth_samples().unwrap();
        let second = source.depth_samples().unwrap();
        assert_ne!(first.samples(), second.samples());
        assert_eq!(source.blob_center(1).0, synthetic::BLOB_STEP);
    }

    #[test]
    fn test_blob_is_nearer_than_wall() {
        let mut source = SyntheticSource::default();
        let frame = source.depth_samples().unwrap();
        let size = frame.size();
        let center = (size.height / 2 * size.width) as usize;
        assert_eq!(frame.samples()[center], synthetic::BLOB_MM);
        assert_eq!(frame.samples()[size.area() - 1], synthetic::WALL_MM);
    }

    #[test]
    fn test_unavailable() {
        let mut source = SyntheticSource::default();
        source.set_available(false);
        assert!(!source.is_available());
        assert_eq!(source.depth_samples().unwrap_err(), SourceError::Unavailable);
    }
}
