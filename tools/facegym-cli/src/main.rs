//! FaceGym CLI: replay and inspect facial exercise sessions.
//!
//! Usage:
//!   facegym run <FRAMES>          Replay a recorded landmark stream through a session
//!   facegym metrics <FRAMES>      Print per-frame metrics and satisfied gestures
//!   facegym calibrate <FRAMES>    Derive a blink threshold from a recording
//!   facegym config [--init]       Show or initialize the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facegym_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "facegym",
    about = "Guided facial exercises driven by face landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded landmark stream through a full session
    Run {
        /// Path to the frames JSONL file
        frames: PathBuf,

        /// Consecutive satisfied frames needed to confirm a step
        #[arg(long)]
        frames_required: Option<u32>,

        /// Rest between steps (seconds)
        #[arg(long)]
        rest_seconds: Option<u32>,

        /// Do not announce instructions
        #[arg(long)]
        no_voice: bool,

        /// Show metrics and confirmation progress
        #[arg(long)]
        detailed: bool,

        /// Print feedback as JSON lines
        #[arg(long)]
        json: bool,

        /// Run blink calibration this many milliseconds after start
        #[arg(long)]
        calibrate_after_ms: Option<u64>,
    },

    /// Print per-frame metrics for a recording
    Metrics {
        /// Path to the frames JSONL file
        frames: PathBuf,
    },

    /// Derive a blink threshold from the start of a recording
    Calibrate {
        /// Path to the frames JSONL file
        frames: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let logging = if cli.verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        }
    } else {
        config.logging.clone()
    };
    facegym_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Run {
            frames,
            frames_required,
            rest_seconds,
            no_voice,
            detailed,
            json,
            calibrate_after_ms,
        } => {
            commands::run::run(
                config,
                commands::run::RunOptions {
                    frames,
                    frames_required,
                    rest_seconds,
                    voice: !no_voice,
                    detailed,
                    json,
                    calibrate_after_ms,
                },
            )
            .await
        }
        Commands::Metrics { frames } => commands::metrics::run(config, frames),
        Commands::Calibrate { frames } => commands::calibrate::run(config, frames).await,
        Commands::Config { init } => commands::config::run(config, init),
    }
}
