// SPDX-License-Identifier: GPL-3.0-only

//! Presentation sinks
//!
//! A sink owns the presentation surface: it reports the surface's live pixel
//! size (used for viewport conversion) and receives each tick's result.

mod snapshot;

pub use snapshot::{SnapshotSink, render_overlay};

use crate::backends::FrameSize;
use crate::errors::AppResult;
use crate::pipelines::presence::{TickResult, TickStatus};
use tracing::{debug, info, warn};

/// Consumer of pipeline results
pub trait PresentationSink {
    /// Current pixel size of the presentation surface
    fn surface_size(&self) -> FrameSize;

    /// Present one tick's result
    ///
    /// Called for every tick, including ticks without data.
    fn present(&mut self, result: &TickResult) -> AppResult<()>;
}

/// Sink that reports each tick through structured logging
pub struct LogSink {
    surface: FrameSize,
    /// Ticks without data seen in a row, so the warning is logged once
    no_data_streak: u64,
}

impl LogSink {
    pub fn new(surface: FrameSize) -> Self {
        Self {
            surface,
            no_data_streak: 0,
        }
    }
}

impl PresentationSink for LogSink {
    fn surface_size(&self) -> FrameSize {
        self.surface
    }

    fn present(&mut self, result: &TickResult) -> AppResult<()> {
        match &result.status {
            TickStatus::NoData(reason) => {
                if self.no_data_streak == 0 {
                    warn!(tick = result.tick, reason = %reason, "No depth data");
                }
                self.no_data_streak += 1;
            }
            TickStatus::Ok => {
                if self.no_data_streak > 0 {
                    info!(missed = self.no_data_streak, "Depth data resumed");
                    self.no_data_streak = 0;
                }

                if result.triggers.is_empty() {
                    debug!(
                        tick = result.tick,
                        valid = result.valid_count,
                        "No triggers"
                    );
                } else {
                    info!(
                        tick = result.tick,
                        valid = result.valid_count,
                        triggers = result.triggers.len(),
                        first = ?result.triggers[0].position,
                        "Wall broken"
                    );
                }

                if result.committed {
                    debug!(
                        tick = result.tick,
                        bounds = ?result.bounds,
                        opaque = result.mask.opaque_count(),
                        "Bounds and mask updated"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Fan a result out to several sinks
///
/// The first sink decides the surface size.
pub struct SinkSet {
    sinks: Vec<Box<dyn PresentationSink>>,
}

impl SinkSet {
    pub fn new(sinks: Vec<Box<dyn PresentationSink>>) -> Self {
        Self { sinks }
    }
}

impl PresentationSink for SinkSet {
    fn surface_size(&self) -> FrameSize {
        self.sinks
            .first()
            .map(|s| s.surface_size())
            .unwrap_or(FrameSize::new(
                crate::constants::COLOR_WIDTH,
                crate::constants::COLOR_HEIGHT,
            ))
    }

    fn present(&mut self, result: &TickResult) -> AppResult<()> {
        for sink in &mut self.sinks {
            sink.present(result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::pipelines::presence::{BoundingRect, OccupancyMask};
    use std::sync::Arc;

    fn result(tick: u64, status: TickStatus) -> TickResult {
        TickResult {
            tick,
            status,
            valid_count: 0,
            triggers: Vec::new(),
            bounds: BoundingRect::ZERO,
            mask: Arc::new(OccupancyMask::empty(FrameSize::new(4, 4))),
            committed: false,
            surface: FrameSize::new(4, 4),
        }
    }

    #[test]
    fn test_log_sink_tracks_no_data_streak() {
        let mut sink = LogSink::new(FrameSize::new(4, 4));
        sink.present(&result(0, TickStatus::NoData(SourceError::Unavailable))).unwrap();
        sink.present(&result(1, TickStatus::NoData(SourceError::Unavailable))).unwrap();
        assert_eq!(sink.no_data_streak, 2);

        sink.present(&result(2, TickStatus::Ok)).unwrap();
        assert_eq!(sink.no_data_streak, 0);
    }

    #[test]
    fn test_sink_set_surface_from_first_sink() {
        let set = SinkSet::new(vec![
            Box::new(LogSink::new(FrameSize::new(800, 600))),
            Box::new(LogSink::new(FrameSize::new(10, 10))),
        ]);
        assert_eq!(set.surface_size(), FrameSize::new(800, 600));

        let empty = SinkSet::new(Vec::new());
        assert_eq!(empty.surface_size(), FrameSize::new(1920, 1080));
    }
}
