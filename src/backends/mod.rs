// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor abstraction
//!
//! The presence pipeline never talks to a sensor runtime directly. It consumes
//! two collaborators through traits:
//!
//! ```text
//! ┌─────────────────────┐
//! │    FrameSource      │  ← raw u16 depth grid, once per tick
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CoordinateMapper   │  ← camera-space + color-space arrays
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  presence pipeline  │
//! └─────────────────────┘
//! ```
//!
//! Bundled implementations: [`SyntheticSource`], [`RecordingSource`] and the
//! pinhole [`IntrinsicsMapper`].

pub mod mapper;
pub mod recording;
pub mod synthetic;
pub mod types;

pub use mapper::IntrinsicsMapper;
pub use recording::RecordingSource;
pub use synthetic::SyntheticSource;
pub use types::*;

use crate::errors::SourceResult;

/// Supplies one depth frame per tick
pub trait FrameSource: Send {
    /// Fetch the current depth frame
    ///
    /// # Returns
    /// * `Ok(DepthFrame)` - Frame of `frame_size()` samples
    /// * `Err(SourceError::Unavailable)` - Sensor not present or not initialized
    fn depth_samples(&mut self) -> SourceResult<DepthFrame>;

    /// Fixed grid size of the frames this source produces
    fn frame_size(&self) -> FrameSize;

    /// Check if the source can currently deliver frames
    fn is_available(&self) -> bool;

    /// Human readable name for logging
    fn name(&self) -> &str;
}

/// Sensor coordinate mapping, consumed as a black box
///
/// Output index `k` corresponds to depth cell `k`. Cells that cannot be mapped
/// receive sentinel values; the caller does not detect them specially. Output
/// slices are caller-owned scratch buffers of `frame.len()` elements.
pub trait CoordinateMapper: Send + Sync {
    /// Unproject every depth cell to metric camera space
    fn map_to_camera_space(&self, frame: &DepthFrame, out: &mut [CameraSpacePoint]);

    /// Project every depth cell to a pixel in the output image
    fn map_to_color_space(&self, frame: &DepthFrame, out: &mut [ColorSpacePoint]);
}
