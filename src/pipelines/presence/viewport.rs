// SPDX-License-Identifier: GPL-3.0-only

//! Output image to presentation surface mapping
//!
//! Positions are normalized against the output image's logical size, clamped
//! to [0, 1], then scaled by the surface's live pixel size.

use super::types::SurfacePoint;
use crate::backends::{ColorSpacePoint, FrameSize};

/// Fixed logical size plus current surface size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub logical: FrameSize,
    pub surface: FrameSize,
}

impl Viewport {
    pub fn new(logical: FrameSize, surface: FrameSize) -> Self {
        Self { logical, surface }
    }

    pub fn to_surface(&self, position: ColorSpacePoint) -> SurfacePoint {
        to_surface(position, self.logical, self.surface)
    }
}

/// Map an output-image pixel position onto the presentation surface
pub fn to_surface(position: ColorSpacePoint, logical: FrameSize, surface: FrameSize) -> SurfacePoint {
    SurfacePoint::new(
        scale_axis(position.x, logical.width, surface.width),
        scale_axis(position.y, logical.height, surface.height),
    )
}

/// Normalize `value` against `logical` (clamped to [0, 1]) and scale by `surface`
///
/// Multiplies before dividing so equal sizes map positions onto themselves
/// exactly.
fn scale_axis(value: f32, logical: u32, surface: u32) -> f32 {
    if logical == 0 {
        return 0.0;
    }
    let logical = logical as f32;
    value.clamp(0.0, logical) * surface as f32 / logical
}
