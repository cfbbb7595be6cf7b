// SPDX-License-Identifier: GPL-3.0-only

//! Presence and virtual-wall trigger pipeline
//!
//! One call to [`run_tick`] performs a complete pass:
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌────────────────┐
//! │ FrameSource │──▶│ CoordinateMapper │──▶│ Spatial filter │
//! └─────────────┘   └──────────────────┘   └───────┬────────┘
//!                                                  │ ValidPoint[]
//!                         ┌────────────────────────┼──────────────────┐
//!                         ▼                        ▼                  ▼
//!                  ┌─────────────┐        ┌───────────────┐    ┌────────────┐
//!                  │  Triggers   │        │ Bounding rect │    │    Mask    │
//!                  └─────────────┘        └───────────────┘    └────────────┘
//! ```
//!
//! The three reductions only read the valid points and may run concurrently.
//! Nothing here blocks or carries data across ticks except the last committed
//! rectangle and mask in [`PipelineState`], used when rectangle and mask are
//! only refreshed on a discrete trigger.

pub mod bounds;
pub mod filter;
pub mod mask;
pub mod triggers;
pub mod types;
pub mod viewport;

pub use bounds::bounding_rect;
pub use filter::filter_valid_points;
pub use mask::OccupancyMask;
pub use triggers::extract_triggers;
pub use types::{BoundingRect, SurfacePoint, TriggerPoint, ValidPoint};
pub use viewport::Viewport;

use crate::backends::{
    CameraSpacePoint, ColorSpacePoint, CoordinateMapper, DepthFrame, FrameSize, FrameSource,
};
use crate::config::{CommitMode, Config, FilterConfig};
use crate::errors::SourceError;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Caller-owned output buffers for the coordinate mapper
///
/// Reused across ticks to avoid reallocating two full-grid arrays per frame.
/// Contents are overwritten by every [`MapperScratch::map`] call.
#[derive(Debug, Default)]
pub struct MapperScratch {
    camera: Vec<CameraSpacePoint>,
    color: Vec<ColorSpacePoint>,
}

impl MapperScratch {
    pub fn new(len: usize) -> Self {
        Self {
            camera: vec![CameraSpacePoint::default(); len],
            color: vec![ColorSpacePoint::default(); len],
        }
    }

    /// Run both mappings for a frame and borrow the results
    pub fn map(
        &mut self,
        mapper: &dyn CoordinateMapper,
        frame: &DepthFrame,
    ) -> (&[CameraSpacePoint], &[ColorSpacePoint]) {
        let len = frame.len();
        if self.camera.len() != len {
            self.camera.resize(len, CameraSpacePoint::default());
            self.color.resize(len, ColorSpacePoint::default());
        }
        mapper.map_to_camera_space(frame, &mut self.camera);
        mapper.map_to_color_space(frame, &mut self.color);
        (&self.camera, &self.color)
    }
}

/// Bounding rectangle and mask, rebuilt together on commit
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub bounds: BoundingRect,
    pub mask: OccupancyMask,
}

/// Results of the reductions over one valid-point set
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub triggers: Vec<TriggerPoint>,
    /// `None` when the tick does not commit
    pub region: Option<Region>,
}

/// Run the trigger reduction, plus bounds and mask when `with_region` is set
///
/// With `parallel` set the reductions run on scoped threads; the output is the
/// same.
pub fn aggregate(
    points: &[ValidPoint],
    filter: &FilterConfig,
    viewport: &Viewport,
    with_region: bool,
    parallel: bool,
) -> Aggregates {
    if !with_region {
        return Aggregates {
            triggers: extract_triggers(points, filter, viewport),
            region: None,
        };
    }

    if !parallel {
        return Aggregates {
            triggers: extract_triggers(points, filter, viewport),
            region: Some(Region {
                bounds: bounding_rect(points, viewport),
                mask: OccupancyMask::build(points, viewport.logical),
            }),
        };
    }

    std::thread::scope(|scope| {
        let triggers = scope.spawn(|| extract_triggers(points, filter, viewport));
        let bounds = scope.spawn(|| bounding_rect(points, viewport));
        let mask = OccupancyMask::build(points, viewport.logical);

        Aggregates {
            triggers: triggers.join().unwrap_or_else(|_| {
                warn!("Trigger reduction panicked, reporting no triggers");
                Vec::new()
            }),
            region: Some(Region {
                bounds: bounds.join().unwrap_or_else(|_| {
                    warn!("Bounds reduction panicked, reporting zero rectangle");
                    BoundingRect::ZERO
                }),
                mask,
            }),
        }
    })
}

/// Whether the tick had data to work with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickStatus {
    /// Filter pass ran on a fresh frame
    Ok,
    /// Frame source could not deliver a usable frame; nothing was computed
    NoData(SourceError),
}

/// Everything a presentation sink needs for one tick
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Monotonic tick counter
    pub tick: u64,
    pub status: TickStatus,
    /// Number of points that passed the spatial filter
    pub valid_count: usize,
    /// Recomputed every tick
    pub triggers: Vec<TriggerPoint>,
    /// Last committed bounding rectangle
    pub bounds: BoundingRect,
    /// Last committed occupancy mask
    pub mask: Arc<OccupancyMask>,
    /// True when `bounds` and `mask` were recomputed on this tick
    pub committed: bool,
    /// Surface size the rectangle and triggers were mapped onto
    pub surface: FrameSize,
}

impl TickResult {
    pub fn has_data(&self) -> bool {
        self.status == TickStatus::Ok
    }
}

/// Caller-owned state carried between ticks
#[derive(Debug)]
pub struct PipelineState {
    scratch: MapperScratch,
    tick: u64,
    committed_bounds: BoundingRect,
    committed_mask: Arc<OccupancyMask>,
}

impl PipelineState {
    pub fn new(config: &Config) -> Self {
        Self {
            scratch: MapperScratch::new(config.depth_size.area()),
            tick: 0,
            committed_bounds: BoundingRect::ZERO,
            committed_mask: Arc::new(OccupancyMask::empty(config.color_size)),
        }
    }

    /// Number of ticks run so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

/// Filter a frame and compute the reductions, without touching any state
pub fn process_frame(
    frame: &DepthFrame,
    mapper: &dyn CoordinateMapper,
    scratch: &mut MapperScratch,
    filter: &FilterConfig,
    viewport: &Viewport,
    with_region: bool,
    parallel: bool,
) -> (usize, Aggregates) {
    let (camera, color) = scratch.map(mapper, frame);
    let valid = filter_valid_points(camera, color, frame.size(), filter);
    let aggregates = aggregate(&valid, filter, viewport, with_region, parallel);
    (valid.len(), aggregates)
}

/// Run one tick of the pipeline
///
/// The configuration is snapshotted for the whole pass. `commit_requested` is
/// the discrete trigger (e.g. a key press) for this tick; it only matters in
/// [`CommitMode::OnDiscreteTrigger`]. Ticks that do not commit only extract
/// triggers. When the source reports itself unavailable, or its frames do not
/// match `config.depth_size`, no filtering happens and the result carries
/// [`TickStatus::NoData`] along with the previously committed rectangle and
/// mask.
pub fn run_tick(
    source: &mut dyn FrameSource,
    mapper: &dyn CoordinateMapper,
    config: &Config,
    surface: FrameSize,
    commit_requested: bool,
    state: &mut PipelineState,
) -> TickResult {
    let filter = config.filter;
    let viewport = Viewport::new(config.color_size, surface);
    let tick = state.tick;
    state.tick += 1;

    let frame = if !source.is_available() {
        Err(SourceError::Unavailable)
    } else if source.frame_size() != config.depth_size {
        Err(SourceError::SizeMismatch {
            expected: config.depth_size.area(),
            actual: source.frame_size().area(),
        })
    } else {
        source.depth_samples()
    };

    let frame = frame.and_then(|frame| {
        if frame.size() != config.depth_size {
            return Err(SourceError::SizeMismatch {
                expected: config.depth_size.area(),
                actual: frame.len(),
            });
        }
        Ok(frame)
    });

    let frame = match frame {
        Ok(frame) => frame,
        Err(e) => {
            warn!(tick, source = source.name(), error = %e, "No depth data this tick");
            return TickResult {
                tick,
                status: TickStatus::NoData(e),
                valid_count: 0,
                triggers: Vec::new(),
                bounds: state.committed_bounds,
                mask: Arc::clone(&state.committed_mask),
                committed: false,
                surface,
            };
        }
    };

    let commit = match config.commit_mode {
        CommitMode::EveryTick => true,
        CommitMode::OnDiscreteTrigger => commit_requested,
    };

    let (valid_count, aggregates) = process_frame(
        &frame,
        mapper,
        &mut state.scratch,
        &filter,
        &viewport,
        commit,
        config.parallel_reductions,
    );

    if let Some(region) = aggregates.region {
        state.committed_bounds = region.bounds;
        state.committed_mask = Arc::new(region.mask);
        debug!(
            tick,
            bounds = ?state.committed_bounds,
            opaque = state.committed_mask.opaque_count(),
            "Committed bounds and mask"
        );
    }

    trace!(tick, valid = valid_count, triggers = aggregates.triggers.len(), "Tick complete");

    TickResult {
        tick,
        status: TickStatus::Ok,
        valid_count,
        triggers: aggregates.triggers,
        bounds: state.committed_bounds,
        mask: Arc::clone(&state.committed_mask),
        committed: commit,
        surface,
    }
}
