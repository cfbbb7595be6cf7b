// SPDX-License-Identifier: GPL-3.0-only

//! Bounding region of the valid points

use super::types::{BoundingRect, ValidPoint};
use super::viewport::Viewport;
use crate::backends::ColorSpacePoint;

/// Component-wise min (top-left) and max (bottom-right) pixel positions
///
/// Points outside the logical output image are skipped. Returns `None` when no
/// point is left.
pub fn pixel_extent(points: &[ValidPoint], viewport: &Viewport) -> Option<(ColorSpacePoint, ColorSpacePoint)> {
    let mut top_left = ColorSpacePoint::new(f32::INFINITY, f32::INFINITY);
    let mut bottom_right = ColorSpacePoint::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    let mut any = false;

    for point in points {
        let p = point.pixel_position;
        if !p.is_within(viewport.logical) {
            continue;
        }
        any = true;
        top_left.x = top_left.x.min(p.x);
        top_left.y = top_left.y.min(p.y);
        bottom_right.x = bottom_right.x.max(p.x);
        bottom_right.y = bottom_right.y.max(p.y);
    }

    any.then_some((top_left, bottom_right))
}

/// Reduce valid points to a rectangle on the presentation surface
///
/// Width and height are truncated toward zero. Empty input, or input with no
/// in-range point, gives [`BoundingRect::ZERO`].
pub fn bounding_rect(points: &[ValidPoint], viewport: &Viewport) -> BoundingRect {
    if points.is_empty() {
        return BoundingRect::ZERO;
    }

    let Some((top_left, bottom_right)) = pixel_extent(points, viewport) else {
        return BoundingRect::ZERO;
    };

    let origin = viewport.to_surface(top_left);
    let corner = viewport.to_surface(bottom_right);

    BoundingRect {
        origin,
        width: (corner.x - origin.x) as u32,
        height: (corner.y - origin.y) as u32,
    }
}
