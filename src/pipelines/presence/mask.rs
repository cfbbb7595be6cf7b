// SPDX-License-Identifier: GPL-3.0-only

//! Occupancy mask
//!
//! The mask is kept sparse: a set of opaque pixel coordinates in the output
//! image. A dense image is only built when a sink asks for one, so building the
//! mask costs O(points) instead of O(image size). It is rebuilt from scratch
//! every time, never patched.

use super::types::ValidPoint;
use crate::backends::FrameSize;
use image::{GrayImage, Luma};
use std::collections::BTreeSet;

/// Alpha value of an opaque mask pixel
pub const OPAQUE: u8 = u8::MAX;
/// Alpha value of a transparent mask pixel
pub const TRANSPARENT: u8 = 0;

/// Binary occupancy image of the output image's logical size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMask {
    size: FrameSize,
    /// Opaque pixels as (y, x) so iteration runs in row-major order
    opaque: BTreeSet<(u32, u32)>,
}

impl OccupancyMask {
    /// Fully transparent mask
    pub fn empty(size: FrameSize) -> Self {
        Self {
            size,
            opaque: BTreeSet::new(),
        }
    }

    /// Stamp every in-range valid point
    ///
    /// Pixel positions are truncated to integer pixels. Positions outside the
    /// image (including unmapped sentinels) are skipped.
    pub fn build(points: &[ValidPoint], size: FrameSize) -> Self {
        let opaque = points
            .iter()
            .map(|p| p.pixel_position)
            .filter(|p| p.is_within(size))
            .map(|p| (p.y as u32, p.x as u32))
            .collect();
        Self { size, opaque }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        self.opaque.contains(&(y, x))
    }

    /// Number of opaque pixels
    pub fn opaque_count(&self) -> usize {
        self.opaque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty()
    }

    /// Opaque pixels as (x, y), row-major
    pub fn opaque_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.opaque.iter().map(|&(y, x)| (x, y))
    }

    /// Dense single-channel alpha image
    pub fn to_alpha_image(&self) -> GrayImage {
        let mut image = GrayImage::from_pixel(self.size.width, self.size.height, Luma([TRANSPARENT]));
        for (x, y) in self.opaque_pixels() {
            image.put_pixel(x, y, Luma([OPAQUE]));
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ColorSpacePoint;

    fn at(x: f32, y: f32) -> ValidPoint {
        ValidPoint::new(ColorSpacePoint::new(x, y), -1.0, -10.0)
    }

    #[test]
    fn test_empty_mask_is_transparent() {
        let mask = OccupancyMask::build(&[], FrameSize::new(8, 4));
        assert!(mask.is_empty());
        assert!(mask.to_alpha_image().pixels().all(|p| p.0[0] == TRANSPARENT));
    }

    #[test]
    fn test_opaque_exactly_at_points() {
        let size = FrameSize::new(16, 8);
        let points = [at(1.0, 2.0), at(15.9, 7.9), at(1.4, 2.6), at(3.0, 0.0)];
        let mask = OccupancyMask::build(&points, size);

        // (1.0, 2.0) and (1.4, 2.6) collapse onto the same pixel
        assert_eq!(mask.opaque_count(), 3);

        let image = mask.to_alpha_image();
        for y in 0..size.height {
            for x in 0..size.width {
                let expected = matches!((x, y), (1, 2) | (15, 7) | (3, 0));
                assert_eq!(image.get_pixel(x, y).0[0] == OPAQUE, expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_out_of_range_skipped() {
        let size = FrameSize::new(4, 4);
        let points = [
            at(-0.5, 1.0),
            at(4.0, 1.0),
            at(f32::NEG_INFINITY, f32::NEG_INFINITY),
            at(f32::NAN, 0.0),
            at(2.0, 2.0),
        ];
        let mask = OccupancyMask::build(&points, size);
        assert_eq!(mask.opaque_pixels().collect::<Vec<_>>(), vec![(2, 2)]);
    }
}
