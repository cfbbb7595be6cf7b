// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use depth_trigger::config::CommitMode;
use depth_trigger::constants::app_info;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depth-trigger")]
#[command(about = "Virtual-wall presence detection for depth sensors")]
#[command(version = app_info::version())]
struct Cli {
    /// Config file (default: ~/.config/depth-trigger/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tick loop and log triggers
    Run {
        /// Stop after this many ticks (default: run until Ctrl+C)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Ticks per second
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Replay a recording directory instead of the synthetic scene
        #[arg(short, long)]
        recording: Option<PathBuf>,

        /// Ticks on which to commit box and mask in on-trigger mode (comma separated)
        #[arg(long, value_delimiter = ',')]
        commit_at: Vec<u64>,

        /// Override the configured commit mode (every-tick, on-trigger)
        #[arg(long)]
        commit_mode: Option<CommitMode>,

        /// Run the reductions on separate threads
        #[arg(long)]
        parallel: bool,

        /// Write committed results as PNG files into this directory
        #[arg(short, long)]
        snapshots: Option<PathBuf>,

        /// Write at most one snapshot per this many ticks
        #[arg(long, default_value = "30")]
        snapshot_every: u64,
    },

    /// Run a few ticks and save the final box and mask as PNG files
    Snapshot {
        /// Ticks to run before saving
        #[arg(short, long, default_value = "1")]
        ticks: u64,

        /// Replay a recording directory instead of the synthetic scene
        #[arg(short, long)]
        recording: Option<PathBuf>,

        /// Output directory (default: ~/Pictures/depth-trigger)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record synthetic depth frames into a directory
    Record {
        /// Output directory
        output: PathBuf,

        /// Number of frames
        #[arg(short, long, default_value = "60")]
        frames: usize,
    },

    /// Show or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Restore defaults
    Reset,
    /// Set a single value
    Set { key: String, value: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depth_trigger=trace, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config_file = cli::config_path(cli.config)?;

    match cli.command {
        Commands::Run {
            ticks,
            fps,
            recording,
            commit_at,
            commit_mode,
            parallel,
            snapshots,
            snapshot_every,
        } => cli::run(
            &config_file,
            cli::RunOptions {
                ticks,
                fps,
                recording,
                commit_at,
                commit_mode,
                parallel,
                snapshots,
                snapshot_every,
            },
        ),
        Commands::Snapshot {
            ticks,
            recording,
            output,
        } => cli::snapshot(&config_file, ticks, recording, output),
        Commands::Record { output, frames } => cli::record_synthetic(&config_file, output, frames),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::config_show(&config_file),
            ConfigAction::Path => {
                println!("{}", config_file.display());
                Ok(())
            }
            ConfigAction::Reset => cli::config_reset(&config_file),
            ConfigAction::Set { key, value } => cli::config_set(&config_file, &key, &value),
        },
    }
}
