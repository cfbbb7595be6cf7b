// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Depth grid resolution of the sensor (Kinect v2 depth stream)
pub const DEPTH_WIDTH: u32 = 512;
pub const DEPTH_HEIGHT: u32 = 424;

/// Logical resolution of the output (color) image the depth grid projects onto
pub const COLOR_WIDTH: u32 = 1920;
pub const COLOR_HEIGHT: u32 = 1080;

/// Stride of the spatial filter's sample index `(j * W + i) * 8`
///
/// One cell in eight is visited: every 8th column of each 8-row band.
pub const ROW_STRIDE: usize = 8;

/// Edge length (surface pixels) of the box drawn for each trigger point
pub const TRIGGER_MARKER_SIZE: f32 = 10.0;

/// Value the sensor mapper writes for cells it could not project
pub const UNMAPPED_SENTINEL: f32 = f32::NEG_INFINITY;

/// Filter tunable ranges and defaults
pub mod filter {
    /// Depth sensitivity scales the trigger plane, range [0, 1]
    pub const SENSITIVITY_MIN: f32 = 0.0;
    pub const SENSITIVITY_MAX: f32 = 1.0;
    pub const DEFAULT_SENSITIVITY: f32 = 1.0;

    /// Threshold (wall) depth in camera-space meters, range [-10, 10]
    pub const THRESHOLD_MIN: f32 = -10.0;
    pub const THRESHOLD_MAX: f32 = 10.0;
    pub const DEFAULT_THRESHOLD: f32 = -10.0;

    /// Axis cutoffs in camera-space meters, range [-1, 1]
    pub const CUTOFF_MIN: f32 = -1.0;
    pub const CUTOFF_MAX: f32 = 1.0;
}

/// Pinhole intrinsics used by the bundled coordinate mapper
///
/// Values approximate a factory-calibrated Kinect v2. Real sensors ship
/// per-device tables; these are close enough for demos and tests.
pub mod intrinsics {
    /// Depth camera focal lengths (pixels) at 512x424
    pub const DEPTH_FX: f32 = 365.456;
    pub const DEPTH_FY: f32 = 365.456;
    /// Depth camera principal point (pixels)
    pub const DEPTH_CX: f32 = 254.878;
    pub const DEPTH_CY: f32 = 205.395;

    /// Color camera focal lengths (pixels) at 1920x1080
    pub const COLOR_FX: f32 = 1081.372;
    pub const COLOR_FY: f32 = 1081.372;
    /// Color camera principal point (pixels)
    pub const COLOR_CX: f32 = 959.5;
    pub const COLOR_CY: f32 = 539.5;

    /// Horizontal offset between the depth and color sensors (meters)
    pub const BASELINE_M: f32 = 0.052;

    /// Depth samples are millimeters; anything outside this is unmapped
    pub const DEPTH_MIN_MM: u16 = 500;
    pub const DEPTH_MAX_MM: u16 = 8000;
}

/// Synthetic source defaults
pub mod synthetic {
    /// Distance to the flat background wall (millimeters)
    pub const WALL_MM: u16 = 4500;
    /// Distance of the intruding blob (millimeters)
    pub const BLOB_MM: u16 = 1500;
    /// Blob radius in depth-grid pixels
    pub const BLOB_RADIUS: u32 = 40;
    /// Horizontal blob travel per tick (depth-grid pixels)
    pub const BLOB_STEP: u32 = 6;
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Directory name used under the user's config and picture folders
    pub const APP_DIR: &str = "depth-trigger";
}
