// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for depth frame sources and coordinate mappers

use crate::constants::UNMAPPED_SENTINEL;
use crate::errors::{SourceError, SourceResult};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Width and height of a pixel grid (depth grid, output image or surface)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells in the grid
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One snapshot of raw depth samples (millimeters) on a fixed grid
///
/// The sample buffer is reference counted so a source can hand the same frame
/// to several consumers without copying. Frames are never mutated.
#[derive(Clone)]
pub struct DepthFrame {
    size: FrameSize,
    samples: Arc<[u16]>,
}

impl DepthFrame {
    /// Wrap a sample buffer, checking it matches the grid size
    pub fn new(size: FrameSize, samples: Vec<u16>) -> SourceResult<Self> {
        if samples.len() != size.area() {
            return Err(SourceError::SizeMismatch {
                expected: size.area(),
                actual: samples.len(),
            });
        }
        Ok(Self {
            size,
            samples: samples.into(),
        })
    }

    /// Frame where every cell has the same depth
    pub fn filled(size: FrameSize, depth_mm: u16) -> Self {
        Self {
            size,
            samples: vec![depth_mm; size.area()].into(),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl std::fmt::Debug for DepthFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DepthFrame({}, {} samples)", self.size, self.samples.len())
    }
}

/// Metric 3D position relative to the depth sensor
///
/// `z` follows the signed convention of the bundled mapper: it is the negated
/// distance along the optical axis, so nearer points have larger `z`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct CameraSpacePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CameraSpacePoint {
    /// Written by mappers for cells they could not unproject
    pub const UNMAPPED: Self = Self {
        x: UNMAPPED_SENTINEL,
        y: UNMAPPED_SENTINEL,
        z: UNMAPPED_SENTINEL,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Pixel position in the output (color) image
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ColorSpacePoint {
    pub x: f32,
    pub y: f32,
}

impl ColorSpacePoint {
    /// Written by mappers for cells they could not project
    pub const UNMAPPED: Self = Self {
        x: UNMAPPED_SENTINEL,
        y: UNMAPPED_SENTINEL,
    };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check the position lies inside `[0, width) x [0, height)`
    ///
    /// Non-finite coordinates (unmapped sentinels, NaN) are never inside.
    pub fn is_within(&self, size: FrameSize) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.x >= 0.0
            && self.y >= 0.0
            && self.x < size.width as f32
            && self.y < size.height as f32
    }
}
