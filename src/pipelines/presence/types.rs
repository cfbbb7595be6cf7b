// SPDX-License-Identifier: GPL-3.0-only

//! Core types produced by the presence pipeline

use crate::backends::ColorSpacePoint;
use serde::Serialize;

/// A depth sample that survived the axis cutoffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidPoint {
    /// Mapped position in the output image
    pub pixel_position: ColorSpacePoint,
    /// Camera-space z of the sample
    pub depth: f32,
    /// `depth >= threshold_depth`, i.e. the point has not crossed the wall
    pub within_threshold_depth: bool,
}

impl ValidPoint {
    pub fn new(pixel_position: ColorSpacePoint, depth: f32, threshold_depth: f32) -> Self {
        Self {
            pixel_position,
            depth,
            within_threshold_depth: depth >= threshold_depth,
        }
    }
}

/// Position on the presentation surface (surface pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point that broke through the sensitivity-scaled wall plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriggerPoint {
    pub position: SurfacePoint,
}

impl TriggerPoint {
    /// Square marker anchored at the point, as drawn by sinks
    pub fn marker_rect(&self, size: f32) -> BoundingRect {
        let edge = size.max(0.0) as u32;
        BoundingRect {
            origin: self.position,
            width: edge,
            height: edge,
        }
    }
}

/// Axis-aligned rectangle on the presentation surface
///
/// `origin` is the top-left corner. The all-zero rectangle means "nothing".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingRect {
    pub origin: SurfacePoint,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    pub const ZERO: Self = Self {
        origin: SurfacePoint::new(0.0, 0.0),
        width: 0,
        height: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}
