// SPDX-License-Identifier: GPL-3.0-only

//! Spatial filter
//!
//! Visits one depth cell in eight and keeps the samples whose camera-space
//! position lies inside the configured cutoffs. For `i < W` and `j < H / 8`
//! the flat sample index is `(j * W + i) * 8`, so band `j` covers rows
//! `8j..8j + 8` and, within each of those rows, every 8th column. The loop
//! runs `i` outermost with `j` ascending inside it.
//!
//! With a grid height that is not a multiple of 8 the trailing partial band of
//! rows is never sampled.

use super::types::ValidPoint;
use crate::backends::{CameraSpacePoint, ColorSpacePoint, FrameSize};
use crate::config::FilterConfig;
use crate::constants::ROW_STRIDE;

/// Flat index into the full-resolution grid for scan step `i` of band `j`
#[inline]
pub fn sample_index(i: usize, j: usize, width: usize) -> usize {
    (j * width + i) * ROW_STRIDE
}

/// Check a camera-space point against the four axis cutoffs
#[inline]
fn passes_cutoffs(point: &CameraSpacePoint, config: &FilterConfig) -> bool {
    !(point.x < config.left_cutoff
        || point.x > config.right_cutoff
        || point.y > config.top_cutoff
        || point.y < config.bottom_cutoff)
}

/// Reduce the mapped depth grid to the valid points
///
/// `camera` and `color` are index-aligned with the depth grid of `grid` size.
/// Sample indices past the end of either slice are skipped.
pub fn filter_valid_points(
    camera: &[CameraSpacePoint],
    color: &[ColorSpacePoint],
    grid: FrameSize,
    config: &FilterConfig,
) -> Vec<ValidPoint> {
    let width = grid.width as usize;
    let bands = grid.height as usize / ROW_STRIDE;
    let mut valid = Vec::new();

    for i in 0..width {
        for j in 0..bands {
            let idx = sample_index(i, j, width);
            let (Some(point), Some(pixel)) = (camera.get(idx), color.get(idx)) else {
                continue;
            };

            if !passes_cutoffs(point, config) {
                continue;
            }

            valid.push(ValidPoint::new(*pixel, point.z, config.threshold_depth));
        }
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: FrameSize = FrameSize::new(512, 424);

    fn arrays(fill: CameraSpacePoint) -> (Vec<CameraSpacePoint>, Vec<ColorSpacePoint>) {
        (
            vec![fill; GRID.area()],
            vec![ColorSpacePoint::new(10.0, 20.0); GRID.area()],
        )
    }

    #[test]
    fn test_sample_index() {
        assert_eq!(sample_index(0, 0, 512), 0);
        assert_eq!(sample_index(4, 2, 512), (2 * 512 + 4) * 8);
    }

    #[test]
    fn test_band_covers_eight_rows_at_column_stride() {
        let width = 512;
        let mut cells: Vec<(usize, usize)> = (0..width)
            .map(|i| {
                let idx = sample_index(i, 1, width);
                (idx / width, idx % width)
            })
            .collect();
        cells.sort();

        let expected: Vec<(usize, usize)> = (8..16)
            .flat_map(|row| (0..width).step_by(8).map(move |col| (row, col)))
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_all_inside_yields_one_point_per_sample() {
        let (camera, color) = arrays(CameraSpacePoint::new(0.0, 0.0, -2.0));
        let valid = filter_valid_points(&camera, &color, GRID, &FilterConfig::default());
        assert_eq!(valid.len(), 512 * (424 / 8));
    }

    #[test]
    fn test_each_cutoff_rejects() {
        let config = FilterConfig {
            left_cutoff: -0.5,
            right_cutoff: 0.5,
            top_cutoff: 0.5,
            bottom_cutoff: -0.5,
            ..FilterConfig::default()
        };
        for point in [
            CameraSpacePoint::new(-0.6, 0.0, -1.0),
            CameraSpacePoint::new(0.6, 0.0, -1.0),
            CameraSpacePoint::new(0.0, 0.6, -1.0),
            CameraSpacePoint::new(0.0, -0.6, -1.0),
        ] {
            let (camera, color) = arrays(point);
            assert!(filter_valid_points(&camera, &color, GRID, &config).is_empty());
        }
    }

    #[test]
    fn test_cutoffs_are_inclusive() {
        let (camera, color) = arrays(CameraSpacePoint::new(1.0, -1.0, -1.0));
        let valid = filter_valid_points(&camera, &color, GRID, &FilterConfig::default());
        assert!(!valid.is_empty());
    }

    #[test]
    fn test_unmapped_cells_rejected() {
        let (camera, color) = arrays(CameraSpacePoint::UNMAPPED);
        assert!(filter_valid_points(&camera, &color, GRID, &FilterConfig::default()).is_empty());
    }

    #[test]
    fn test_partial_band_not_sampled() {
        // 20 rows -> 2 bands of 8, rows 16..20 are never visited
        let grid = FrameSize::new(4, 20);
        let camera = vec![CameraSpacePoint::new(0.0, 0.0, -1.0); grid.area()];
        let color = vec![ColorSpacePoint::new(0.0, 0.0); grid.area()];
        let valid = filter_valid_points(&camera, &color, grid, &FilterConfig::default());
        assert_eq!(valid.len(), 4 * 2);
    }

    #[test]
    fn test_short_arrays_are_skipped() {
        let camera = vec![CameraSpacePoint::new(0.0, 0.0, -1.0); 10];
        let color = vec![ColorSpacePoint::new(0.0, 0.0); 10];
        let valid = filter_valid_points(&camera, &color, GRID, &FilterConfig::default());
        // Only sample index 8 (i=1, j=0) and 0 fit in ten cells
        assert_eq!(valid.len(), 2);
    }

    #[test]
    fn test_threshold_flag() {
        let config = FilterConfig {
            threshold_depth: -3.0,
            ..FilterConfig::default()
        };
        let (camera, color) = arrays(CameraSpacePoint::new(0.0, 0.0, -3.0));
        let valid = filter_valid_points(&camera, &color, GRID, &config);
        assert!(valid.iter().all(|p| p.within_threshold_depth));

        let (camera, color) = arrays(CameraSpacePoint::new(0.0, 0.0, -3.5));
        let valid = filter_valid_points(&camera, &color, GRID, &config);
        assert!(valid.iter().all(|p| !p.within_threshold_depth));
    }
}
