// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under the platform config directory. The filter tunables are
//! the only state that outlives a tick; the pipeline copies them once at the
//! start of every pass.

use crate::backends::FrameSize;
use crate::constants::{
    COLOR_HEIGHT, COLOR_WIDTH, DEPTH_HEIGHT, DEPTH_WIDTH, TRIGGER_MARKER_SIZE, app_info, filter,
};
use crate::errors::{AppResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Spatial filter tunables
///
/// Cutoffs are camera-space meters. The filter does not validate them: with
/// `left_cutoff > right_cutoff` or `bottom_cutoff > top_cutoff` every point is
/// rejected. The setters clamp to the documented ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Scales the trigger plane, [0, 1]
    pub depth_sensitivity: f32,
    /// Virtual wall depth (camera-space z), [-10, 10]
    pub threshold_depth: f32,
    /// Upper y bound, [-1, 1]
    pub top_cutoff: f32,
    /// Lower y bound, [-1, 1]
    pub bottom_cutoff: f32,
    /// Lower x bound, [-1, 1]
    pub left_cutoff: f32,
    /// Upper x bound, [-1, 1]
    pub right_cutoff: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            depth_sensitivity: filter::DEFAULT_SENSITIVITY,
            threshold_depth: filter::DEFAULT_THRESHOLD,
            top_cutoff: filter::CUTOFF_MAX,
            bottom_cutoff: filter::CUTOFF_MIN,
            left_cutoff: filter::CUTOFF_MIN,
            right_cutoff: filter::CUTOFF_MAX,
        }
    }
}

impl FilterConfig {
    pub fn set_depth_sensitivity(&mut self, value: f32) {
        self.depth_sensitivity = value.clamp(filter::SENSITIVITY_MIN, filter::SENSITIVITY_MAX);
    }

    pub fn set_threshold_depth(&mut self, value: f32) {
        self.threshold_depth = value.clamp(filter::THRESHOLD_MIN, filter::THRESHOLD_MAX);
    }

    pub fn set_top_cutoff(&mut self, value: f32) {
        self.top_cutoff = clamp_cutoff(value);
    }

    pub fn set_bottom_cutoff(&mut self, value: f32) {
        self.bottom_cutoff = clamp_cutoff(value);
    }

    pub fn set_left_cutoff(&mut self, value: f32) {
        self.left_cutoff = clamp_cutoff(value);
    }

    pub fn set_right_cutoff(&mut self, value: f32) {
        self.right_cutoff = clamp_cutoff(value);
    }

    /// Check cutoffs describe a non-empty volume
    pub fn has_ordered_cutoffs(&self) -> bool {
        self.left_cutoff <= self.right_cutoff && self.bottom_cutoff <= self.top_cutoff
    }

    /// Effective trigger plane after sensitivity scaling
    pub fn trigger_plane(&self) -> f32 {
        self.threshold_depth * self.depth_sensitivity
    }
}

fn clamp_cutoff(value: f32) -> f32 {
    value.clamp(filter::CUTOFF_MIN, filter::CUTOFF_MAX)
}

/// When the bounding rectangle and mask are recomputed
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum CommitMode {
    /// Recompute rectangle and mask on every tick
    #[default]
    EveryTick,
    /// Recompute only on ticks where a discrete trigger (key press) arrived
    OnDiscreteTrigger,
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitMode::EveryTick => write!(f, "every-tick"),
            CommitMode::OnDiscreteTrigger => write!(f, "on-trigger"),
        }
    }
}

impl std::str::FromStr for CommitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "every-tick" | "everytick" | "continuous" => Ok(CommitMode::EveryTick),
            "on-trigger" | "ondiscretetrigger" | "key" => Ok(CommitMode::OnDiscreteTrigger),
            other => Err(format!("unknown commit mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spatial filter tunables
    pub filter: FilterConfig,
    /// Rectangle/mask recompute policy
    pub commit_mode: CommitMode,
    /// Depth grid size delivered by the frame source
    pub depth_size: FrameSize,
    /// Logical size of the output (color) image
    pub color_size: FrameSize,
    /// Presentation surface size used for viewport conversion
    pub surface_size: FrameSize,
    /// Run trigger, bounds and mask reductions on separate threads
    pub parallel_reductions: bool,
    /// Edge length of the box drawn per trigger point (surface pixels)
    pub trigger_marker_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            commit_mode: CommitMode::default(),
            depth_size: FrameSize::new(DEPTH_WIDTH, DEPTH_HEIGHT),
            color_size: FrameSize::new(COLOR_WIDTH, COLOR_HEIGHT),
            // Surface matches the color image until a sink reports otherwise
            surface_size: FrameSize::new(COLOR_WIDTH, COLOR_HEIGHT),
            parallel_reductions: false,
            trigger_marker_size: TRIGGER_MARKER_SIZE,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> AppResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(app_info::APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default(&path),
            Err(e) => {
                warn!(error = %e, "Using default configuration");
                Self::default()
            }
        }
    }

    /// Load from a path, falling back to defaults when missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from a path
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save to a path, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Parse)?;
        std::fs::write(path, contents)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Set a single value by key, as used by `config set`
    ///
    /// Filter values are clamped to their ranges.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let float = || value.trim().parse::<f32>().map_err(|_| invalid());
        let uint = || value.trim().parse::<u32>().map_err(|_| invalid());

        match key {
            "depth_sensitivity" => self.filter.set_depth_sensitivity(float()?),
            "threshold_depth" => self.filter.set_threshold_depth(float()?),
            "top_cutoff" => self.filter.set_top_cutoff(float()?),
            "bottom_cutoff" => self.filter.set_bottom_cutoff(float()?),
            "left_cutoff" => self.filter.set_left_cutoff(float()?),
            "right_cutoff" => self.filter.set_right_cutoff(float()?),
            "commit_mode" => self.commit_mode = value.parse().map_err(|_| invalid())?,
            "parallel_reductions" => {
                self.parallel_reductions = value.trim().parse().map_err(|_| invalid())?
            }
            "surface_width" => self.surface_size.width = uint()?.max(1),
            "surface_height" => self.surface_size.height = uint()?.max(1),
            "trigger_marker_size" => self.trigger_marker_size = float()?.max(0.0),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        if !self.filter.has_ordered_cutoffs() {
            warn!(filter = ?self.filter, "Cutoffs are inverted, every point will be rejected");
        }
        Ok(())
    }

    /// Current value of a key accepted by [`Config::set_value`]
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "depth_sensitivity" => self.filter.depth_sensitivity.to_string(),
            "threshold_depth" => self.filter.threshold_depth.to_string(),
            "top_cutoff" => self.filter.top_cutoff.to_string(),
            "bottom_cutoff" => self.filter.bottom_cutoff.to_string(),
            "left_cutoff" => self.filter.left_cutoff.to_string(),
            "right_cutoff" => self.filter.right_cutoff.to_string(),
            "commit_mode" => self.commit_mode.to_string(),
            "parallel_reductions" => self.parallel_reductions.to_string(),
            "surface_width" => self.surface_size.width.to_string(),
            "surface_height" => self.surface_size.height.to_string(),
            "trigger_marker_size" => self.trigger_marker_size.to_string(),
            _ => return None,
        };
        Some(value)
    }
}
