// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the depth trigger pipeline
//!
//! The core reductions (filter, triggers, bounds, mask) never fail. Errors only
//! come from acquiring frames, loading configuration and writing snapshots.

use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type for frame sources
pub type SourceResult<T> = Result<T, SourceError>;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Frame source or coordinate mapper errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Frame acquisition errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Sensor not present or not initialized
    #[error("Frame source unavailable")]
    Unavailable,
    /// Frame has a different size than the pipeline expects
    #[error("Frame size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// Recording directory had no usable frames
    #[error("No frames found in recording: {0}")]
    EmptyRecording(String),
    /// Recording frame could not be read
    #[error("Failed to read recording frame: {0}")]
    Read(String),
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory is available
    #[error("No configuration directory available")]
    NoConfigDir,
    /// Config file exists but is not valid JSON for this version
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),
    /// Unknown key passed to `config set`
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
    /// Value could not be parsed for the given key
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}
