// SPDX-License-Identifier: GPL-3.0-only

//! Pinhole coordinate mapper
//!
//! Stand-in for the sensor SDK's coordinate mapper so the pipeline can run
//! against synthetic or recorded frames. Depth samples are millimeters.
//!
//! - Camera space: `x` right, `y` up, `z = -distance` (meters)
//! - Color space: pixels in the 1920x1080 color image, origin top-left

use super::types::{CameraSpacePoint, ColorSpacePoint, DepthFrame};
use super::CoordinateMapper;
use crate::constants::{intrinsics, DEPTH_HEIGHT, DEPTH_WIDTH};

/// Intrinsics for depth unprojection and color projection
#[derive(Debug, Clone, Copy, PartialEq)]
struct MapperIntrinsics {
    depth_fx: f32,
    depth_fy: f32,
    depth_cx: f32,
    depth_cy: f32,
    color_fx: f32,
    color_fy: f32,
    color_cx: f32,
    color_cy: f32,
    /// Horizontal offset of the color sensor from the depth sensor (meters)
    baseline: f32,
    min_depth_mm: u16,
    max_depth_mm: u16,
}

impl Default for MapperIntrinsics {
    fn default() -> Self {
        Self {
            depth_fx: intrinsics::DEPTH_FX,
            depth_fy: intrinsics::DEPTH_FY,
            depth_cx: intrinsics::DEPTH_CX,
            depth_cy: intrinsics::DEPTH_CY,
            color_fx: intrinsics::COLOR_FX,
            color_fy: intrinsics::COLOR_FY,
            color_cx: intrinsics::COLOR_CX,
            color_cy: intrinsics::COLOR_CY,
            baseline: intrinsics::BASELINE_M,
            min_depth_mm: intrinsics::DEPTH_MIN_MM,
            max_depth_mm: intrinsics::DEPTH_MAX_MM,
        }
    }
}

/// Coordinate mapper based on a pinhole camera model
#[derive(Debug, Clone, Default)]
pub struct IntrinsicsMapper {
    intrinsics: MapperIntrinsics,
}

impl IntrinsicsMapper {
    /// Unproject a single depth cell, `None` when the sample is out of range
    fn unproject(&self, u: u32, v: u32, depth_mm: u16, scale: (f32, f32)) -> Option<CameraSpacePoint> {
        let k = &self.intrinsics;
        if depth_mm < k.min_depth_mm || depth_mm > k.max_depth_mm {
            return None;
        }

        // Intrinsics are for 512x424; scale them for other grid sizes
        let (scale_x, scale_y) = scale;
        let fx = k.depth_fx * scale_x;
        let fy = k.depth_fy * scale_y;
        let cx = k.depth_cx * scale_x;
        let cy = k.depth_cy * scale_y;

        let d = depth_mm as f32 / 1000.0;
        let x = (u as f32 - cx) * d / fx;
        let y = (cy - v as f32) * d / fy;
        Some(CameraSpacePoint::new(x, y, -d))
    }

    fn project(&self, point: CameraSpacePoint) -> ColorSpacePoint {
        let k = &self.intrinsics;
        let d = -point.z;
        let x = k.color_fx * (point.x + k.baseline) / d + k.color_cx;
        let y = k.color_cy - k.color_fy * point.y / d;
        ColorSpacePoint::new(x, y)
    }

    fn grid_scale(frame: &DepthFrame) -> (f32, f32) {
        let size = frame.size();
        (
            size.width as f32 / DEPTH_WIDTH as f32,
            size.height as f32 / DEPTH_HEIGHT as f32,
        )
    }
}

impl CoordinateMapper for IntrinsicsMapper {
    fn map_to_camera_space(&self, frame: &DepthFrame, out: &mut [CameraSpacePoint]) {
        let width = frame.size().width.max(1);
        let scale = Self::grid_scale(frame);

        for (idx, (slot, &depth)) in out.iter_mut().zip(frame.samples()).enumerate() {
            let u = idx as u32 % width;
            let v = idx as u32 / width;
            *slot = self
                .unproject(u, v, depth, scale)
                .unwrap_or(CameraSpacePoint::UNMAPPED);
        }
    }

    fn map_to_color_space(&self, frame: &DepthFrame, out: &mut [ColorSpacePoint]) {
        let width = frame.size().width.max(1);
        let scale = Self::grid_scale(frame);

        for (idx, (slot, &depth)) in out.iter_mut().zip(frame.samples()).enumerate() {
            let u = idx as u32 % width;
            let v = idx as u32 / width;
            *slot = self
                .unproject(u, v, depth, scale)
                .map(|p| self.project(p))
                .unwrap_or(ColorSpacePoint::UNMAPPED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::types::FrameSize;
    use crate::constants::{COLOR_HEIGHT, COLOR_WIDTH};

    fn map_both(frame: &DepthFrame) -> (Vec<CameraSpacePoint>, Vec<ColorSpacePoint>) {
        let mapper = IntrinsicsMapper::default();
        let mut camera = vec![CameraSpacePoint::default(); frame.len()];
        let mut color = vec![ColorSpacePoint::default(); frame.len()];
        mapper.map_to_camera_space(frame, &mut camera);
        mapper.map_to_color_space(frame, &mut color);
        (camera, color)
    }

    #[test]
    fn test_depth_becomes_negative_z() {
        let frame = DepthFrame::filled(FrameSize::new(DEPTH_WIDTH, DEPTH_HEIGHT), 2000);
        let (camera, _) = map_both(&frame);
        assert!(camera.iter().all(|p| (p.z + 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_zero_depth_is_unmapped() {
        let frame = DepthFrame::filled(FrameSize::new(8, 8), 0);
        let (camera, color) = map_both(&frame);
        assert!(camera.iter().all(|p| *p == CameraSpacePoint::UNMAPPED));
        assert!(color.iter().all(|p| *p == ColorSpacePoint::UNMAPPED));
    }

    #[test]
    fn test_principal_point_lands_near_color_center() {
        let size = FrameSize::new(DEPTH_WIDTH, DEPTH_HEIGHT);
        let frame = DepthFrame::filled(size, 3000);
        let (camera, color) = map_both(&frame);

        // Cell closest to the depth principal point
        let idx = 205 * DEPTH_WIDTH as usize + 255;
        assert!(camera[idx].x.abs() < 0.01);
        assert!(camera[idx].y.abs() < 0.01);
        assert!(color[idx].is_within(FrameSize::new(COLOR_WIDTH, COLOR_HEIGHT)));
        assert!((color[idx].y - intrinsics::COLOR_CY).abs() < 5.0);
    }

    #[test]
    fn test_axes_orientation() {
        let size = FrameSize::new(DEPTH_WIDTH, DEPTH_HEIGHT);
        let frame = DepthFrame::filled(size, 3000);
        let (camera, color) = map_both(&frame);

        let top_left = 0;
        let bottom_right = size.area() - 1;
        // Left of frame is negative x, top of frame is positive y
        assert!(camera[top_left].x < 0.0 && camera[top_left].y > 0.0);
        assert!(camera[bottom_right].x > 0.0 && camera[bottom_right].y < 0.0);
        // Color image keeps the same left/right and top/bottom ordering
        assert!(color[top_left].x < color[bottom_right].x);
        assert!(color[top_left].y < color[bottom_right].y);
    }
}
