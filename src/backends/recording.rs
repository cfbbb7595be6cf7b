// SPDX-License-Identifier: GPL-3.0-only

//! Recorded depth frame source
//!
//! A recording is a directory of `frame_NNNNNN.raw` files, each holding one
//! frame of little-endian `u16` depth samples (millimeters) with no header.
//! Playback loops back to the first frame after the last one.

use super::types::{DepthFrame, FrameSize};
use super::FrameSource;
use crate::errors::{SourceError, SourceResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extension of recorded frames
pub const RECORDING_EXTENSION: &str = "raw";

/// Frame source replaying a directory of raw depth dumps
pub struct RecordingSource {
    size: FrameSize,
    frames: Vec<PathBuf>,
    next: usize,
    name: String,
}

impl RecordingSource {
    /// Open a recording directory
    ///
    /// Frame files are played back in file-name order.
    pub fn open(dir: &Path, size: FrameSize) -> SourceResult<Self> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| SourceError::Read(format!("{}: {}", dir.display(), e)))?;

        let mut frames: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(RECORDING_EXTENSION))
            })
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(SourceError::EmptyRecording(dir.display().to_string()));
        }

        info!(dir = %dir.display(), frames = frames.len(), size = %size, "Opened depth recording");

        Ok(Self {
            size,
            frames,
            next: 0,
            name: format!("recording:{}", dir.display()),
        })
    }

    /// Number of frames in the recording
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Write one frame into a recording directory
    pub fn write_frame(dir: &Path, index: usize, frame: &DepthFrame) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("frame_{:06}.{}", index, RECORDING_EXTENSION));

        let little_endian: Vec<u16> = frame.samples().iter().map(|d| d.to_le()).collect();
        std::fs::write(&path, bytemuck::cast_slice::<u16, u8>(&little_endian))?;

        debug!(path = %path.display(), "Wrote depth frame");
        Ok(path)
    }

    fn read_frame(&self, path: &Path) -> SourceResult<DepthFrame> {
        let bytes = std::fs::read(path)
            .map_err(|e| SourceError::Read(format!("{}: {}", path.display(), e)))?;

        let expected_bytes = self.size.area() * std::mem::size_of::<u16>();
        if bytes.len() != expected_bytes {
            return Err(SourceError::SizeMismatch {
                expected: self.size.area(),
                actual: bytes.len() / std::mem::size_of::<u16>(),
            });
        }

        // Byte buffer may not be u16 aligned, so copy rather than cast in place
        let samples: Vec<u16> = bytemuck::pod_collect_to_vec::<u8, u16>(&bytes)
            .into_iter()
            .map(u16::from_le)
            .collect();
        DepthFrame::new(self.size, samples)
    }
}

impl FrameSource for RecordingSource {
    fn depth_samples(&mut self) -> SourceResult<DepthFrame> {
        let path = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();

        self.read_frame(&path).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "Skipping unreadable recording frame");
        })
    }

    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn is_available(&self) -> bool {
        !self.frames.is_empty()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "depth-trigger-recording-{}-{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_then_replay_loops() {
        let dir = scratch_dir("loop");
        let size = FrameSize::new(4, 3);
        let first = DepthFrame::new(size, (0..12).collect()).unwrap();
        let second = DepthFrame::filled(size, 1234);
        RecordingSource::write_frame(&dir, 0, &first).unwrap();
        RecordingSource::write_frame(&dir, 1, &second).unwrap();

        let mut source = RecordingSource::open(&dir, size).unwrap();
        assert_eq!(source.frame_count(), 2);
        assert_eq!(source.depth_samples().unwrap().samples(), first.samples());
        assert_eq!(source.depth_samples().unwrap().samples(), second.samples());
        assert_eq!(source.depth_samples().unwrap().samples(), first.samples());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_wrong_size_frame_rejected() {
        let dir = scratch_dir("size");
        let frame = DepthFrame::filled(FrameSize::new(4, 4), 900);
        RecordingSource::write_frame(&dir, 0, &frame).unwrap();

        let mut source = RecordingSource::open(&dir, FrameSize::new(4, 3)).unwrap();
        assert_eq!(
            source.depth_samples().unwrap_err(),
            SourceError::SizeMismatch {
                expected: 12,
                actual: 16
            }
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_directory() {
        let dir = scratch_dir("empty");
        std::fs::create_dir_all(&dir).unwrap();
        assert!(matches!(
            RecordingSource::open(&dir, FrameSize::new(4, 3)),
            Err(SourceError::EmptyRecording(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
