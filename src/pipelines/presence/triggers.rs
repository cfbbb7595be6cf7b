// SPDX-License-Identifier: GPL-3.0-only

//! Trigger extraction
//!
//! A valid point triggers when it is past the wall (`!within_threshold_depth`)
//! and deeper than the sensitivity-scaled plane
//! (`depth < threshold_depth * depth_sensitivity`). With a negative threshold,
//! lowering the sensitivity pulls the trigger plane toward the sensor.

use super::types::{TriggerPoint, ValidPoint};
use super::viewport::Viewport;
use crate::config::FilterConfig;

/// Check the trigger policy for one point
#[inline]
pub fn is_trigger(point: &ValidPoint, config: &FilterConfig) -> bool {
    !point.within_threshold_depth && point.depth < config.trigger_plane()
}

/// Reduce valid points to trigger points on the presentation surface
pub fn extract_triggers(
    points: &[ValidPoint],
    config: &FilterConfig,
    viewport: &Viewport,
) -> Vec<TriggerPoint> {
    points
        .iter()
        .filter(|p| is_trigger(p, config))
        .map(|p| TriggerPoint {
            position: viewport.to_surface(p.pixel_position),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{ColorSpacePoint, FrameSize};
    use crate::pipelines::presence::types::SurfacePoint;

    fn viewport() -> Viewport {
        let hd = FrameSize::new(1920, 1080);
        Viewport::new(hd, hd)
    }

    fn config(threshold: f32, sensitivity: f32) -> FilterConfig {
        FilterConfig {
            threshold_depth: threshold,
            depth_sensitivity: sensitivity,
            ..FilterConfig::default()
        }
    }

    #[test]
    fn test_within_threshold_never_triggers() {
        let config = config(-3.0, 1.0);
        // Flag forced true even though depth would pass the plane test
        let point = ValidPoint {
            pixel_position: ColorSpacePoint::new(1.0, 1.0),
            depth: -9.0,
            within_threshold_depth: true,
        };
        assert!(extract_triggers(&[point], &config, &viewport()).is_empty());
    }

    #[test]
    fn test_past_wall_triggers() {
        let config = config(-3.0, 1.0);
        let point = ValidPoint::new(ColorSpacePoint::new(100.0, 200.0), -5.0, -3.0);
        let triggers = extract_triggers(&[point], &config, &viewport());
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].position, SurfacePoint::new(100.0, 200.0));
    }

    #[test]
    fn test_sensitivity_scales_plane() {
        // Plane at -4 * 0.5 = -2; a point at -5 is past the wall and past -2
        let point = ValidPoint::new(ColorSpacePoint::new(1.0, 1.0), -5.0, -4.0);
        assert!(is_trigger(&point, &config(-4.0, 0.5)));

        // Positive threshold: plane at 2 * 0.5 = 1, point at 1.5 is past the
        // wall (1.5 < 2) but not past the scaled plane
        let point = ValidPoint::new(ColorSpacePoint::new(1.0, 1.0), 1.5, 2.0);
        assert!(!point.within_threshold_depth);
        assert!(!is_trigger(&point, &config(2.0, 0.5)));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_triggers(&[], &FilterConfig::default(), &viewport()).is_empty());
    }
}
