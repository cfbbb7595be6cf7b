// SPDX-License-Identifier: GPL-3.0-only

//! Depth Trigger - virtual-wall presence detection for depth sensors
//!
//! Each tick pulls one depth frame, maps it into camera and color space, keeps
//! the samples inside a configurable box and reduces them to trigger points, a
//! bounding rectangle and an occupancy mask for a presentation surface.
//!
//! # Architecture
//!
//! - [`backends`]: Frame sources and coordinate mappers
//! - [`pipelines`]: The per-tick presence pipeline
//! - [`presentation`]: Sinks consuming tick results
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```no_run
//! use depth_trigger::backends::{IntrinsicsMapper, SyntheticSource};
//! use depth_trigger::pipelines::presence::{PipelineState, run_tick};
//! use depth_trigger::Config;
//!
//! let config = Config::default();
//! let mut state = PipelineState::new(&config);
//! let mut source = SyntheticSource::default();
//! let mapper = IntrinsicsMapper::default();
//!
//! let result = run_tick(&mut source, &mapper, &config, config.surface_size, false, &mut state);
//! println!("{} triggers", result.triggers.len());
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod presentation;

// Re-export commonly used types
pub use config::{CommitMode, Config, FilterConfig};
pub use errors::{AppError, AppResult, ConfigError, SourceError};
pub use pipelines::presence::{TickResult, TickStatus};
