// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the presence pipeline
//!
//! This module provides command-line functionality for:
//! - Running the tick loop against a synthetic or recorded source
//! - Writing a one-off snapshot of the box and mask
//! - Recording synthetic frames for later playback
//! - Inspecting and editing the configuration file

use depth_trigger::backends::{
    FrameSource, IntrinsicsMapper, RecordingSource, SyntheticSource,
};
use depth_trigger::config::{CommitMode, Config};
use depth_trigger::constants::app_info;
use depth_trigger::pipelines::presence::{PipelineState, run_tick};
use depth_trigger::presentation::{LogSink, PresentationSink, SinkSet, SnapshotSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Options for the `run` command
pub struct RunOptions {
    pub ticks: Option<u64>,
    pub fps: u32,
    pub recording: Option<PathBuf>,
    pub commit_at: Vec<u64>,
    pub commit_mode: Option<CommitMode>,
    pub parallel: bool,
    pub snapshots: Option<PathBuf>,
    pub snapshot_every: u64,
}

/// Resolve the config file path, honoring an override
pub fn config_path(path: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(path),
        None => Ok(Config::default_path()?),
    }
}

fn open_source(recording: Option<&Path>, config: &Config) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    match recording {
        Some(dir) => {
            let source = RecordingSource::open(dir, config.depth_size)?;
            println!(
                "Source: {} ({} frames of {})",
                source.name(),
                source.frame_count(),
                source.frame_size()
            );
            Ok(Box::new(source))
        }
        None => {
            let source = SyntheticSource::new(config.depth_size, Default::default());
            println!("Source: {} ({})", source.name(), source.frame_size());
            Ok(Box::new(source))
        }
    }
}

/// Run the tick loop until the tick limit or Ctrl+C
pub fn run(config_file: &Path, options: RunOptions) -> CliResult {
    let mut config = Config::load_or_default(config_file);
    if let Some(mode) = options.commit_mode {
        config.commit_mode = mode;
    }
    config.parallel_reductions |= options.parallel;

    let mut source = open_source(options.recording.as_deref(), &config)?;
    let mapper = IntrinsicsMapper::default();
    let mut state = PipelineState::new(&config);

    let mut sinks: Vec<Box<dyn PresentationSink>> = vec![Box::new(LogSink::new(config.surface_size))];
    if let Some(dir) = options.snapshots {
        println!("Snapshots: {}", dir.display());
        sinks.push(Box::new(
            SnapshotSink::new(dir, config.surface_size, config.trigger_marker_size)
                .with_interval(options.snapshot_every),
        ));
    }
    let mut sinks = SinkSet::new(sinks);

    println!("depth-trigger {}", app_info::version());
    println!("Commit mode: {}", config.commit_mode);
    println!("Trigger plane: {:.2}", config.filter.trigger_plane());
    println!();
    println!("Running... (press Ctrl+C to stop)");

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let frame_interval = Duration::from_secs_f64(1.0 / options.fps.max(1) as f64);
    let start = Instant::now();
    let mut next_tick = start;
    let mut trigger_ticks = 0u64;
    let mut no_data_ticks = 0u64;

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping...");
            break;
        }
        if options.ticks.is_some_and(|limit| state.ticks() >= limit) {
            break;
        }

        let commit_requested = options.commit_at.contains(&state.ticks());
        let surface = sinks.surface_size();
        let result = run_tick(
            source.as_mut(),
            &mapper,
            &config,
            surface,
            commit_requested,
            &mut state,
        );

        if !result.has_data() {
            no_data_ticks += 1;
        } else if !result.triggers.is_empty() {
            trigger_ticks += 1;
        }

        sinks.present(&result)?;

        print!(
            "\rTick {:>6}  triggers {:>5}  box {}x{}",
            result.tick,
            result.triggers.len(),
            result.bounds.width,
            result.bounds.height
        );
        std::io::Write::flush(&mut std::io::stdout())?;

        next_tick += frame_interval;
        match next_tick.checked_duration_since(Instant::now()) {
            Some(wait) => std::thread::sleep(wait),
            // Fell behind; don't try to catch up with a burst of ticks
            None => next_tick = Instant::now(),
        }
    }
    println!();

    println!(
        "Ran {} ticks in {:.2}s ({} with triggers, {} without data)",
        state.ticks(),
        start.elapsed().as_secs_f64(),
        trigger_ticks,
        no_data_ticks
    );
    Ok(())
}

/// Run a few ticks and write the final box and mask to PNG files
pub fn snapshot(
    config_file: &Path,
    ticks: u64,
    recording: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult {
    let config = Config::load_or_default(config_file);
    let mut source = open_source(recording.as_deref(), &config)?;
    let mapper = IntrinsicsMapper::default();
    let mut state = PipelineState::new(&config);

    let ticks = ticks.max(1);
    let mut last = None;
    for tick in 0..ticks {
        let commit_requested = tick + 1 == ticks;
        last = Some(run_tick(
            source.as_mut(),
            &mapper,
            &config,
            config.surface_size,
            commit_requested,
            &mut state,
        ));
    }

    let Some(result) = last.filter(|r| r.has_data()) else {
        return Err("no depth data on the final tick".into());
    };

    let output_dir = output.unwrap_or_else(SnapshotSink::default_dir);
    let mut sink = SnapshotSink::new(output_dir, config.surface_size, config.trigger_marker_size);
    let (mask_path, overlay_path) = sink.write(&result)?;

    println!("Triggers: {}", result.triggers.len());
    println!(
        "Bounding box: {}x{} at ({:.0}, {:.0})",
        result.bounds.width, result.bounds.height, result.bounds.origin.x, result.bounds.origin.y
    );
    println!("Mask saved: {}", mask_path.display());
    println!("Overlay saved: {}", overlay_path.display());
    Ok(())
}

/// Write synthetic frames into a recording directory
pub fn record_synthetic(config_file: &Path, output: PathBuf, frames: usize) -> CliResult {
    let config = Config::load_or_default(config_file);
    let mut source = SyntheticSource::new(config.depth_size, Default::default());

    println!("Recording {} synthetic frames to {}", frames, output.display());
    for index in 0..frames {
        let frame = source.depth_samples()?;
        RecordingSource::write_frame(&output, index, &frame)?;
    }
    println!("Done.");
    Ok(())
}

/// Print the effective configuration as JSON
pub fn config_show(config_file: &Path) -> CliResult {
    let config = Config::load_or_default(config_file);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Overwrite the config file with defaults
pub fn config_reset(config_file: &Path) -> CliResult {
    Config::default().save_to(config_file)?;
    println!("Configuration reset: {}", config_file.display());
    Ok(())
}

/// Change one key in the config file
pub fn config_set(config_file: &Path, key: &str, value: &str) -> CliResult {
    let mut config = Config::load_or_default(config_file);
    config.set_value(key, value)?;
    config.save_to(config_file)?;
    // Report what was stored, which may be clamped
    let stored = config.get_value(key).unwrap_or_else(|| value.to_string());
    println!("{} = {}", key, stored);
    Ok(())
}
