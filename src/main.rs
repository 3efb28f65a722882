//! flower-sim: host simulator for the expression flower.
//!
//! Replays a recorded face-detection scenario against a flower built on
//! in-memory actuators, with the real state machine and sequence
//! workers running in real time.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  scenario.json ──▶ FaceTracker ──▶ FlowerService ──▶ SimMotor │
//! │   (frames)          (priority,      (FSM, sequence   SimLeds  │
//! │                      classify)       workers)                 │
//! │                                          │                    │
//! │                                          └──▶ LogEventSink    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `flower-sim [--config flower.json] scenario.json`, with the log
//! level taken from `FLOWER_LOG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;
use serde::Deserialize;

use exprflower::FlowerService;
use exprflower::adapters::config_file::JsonConfigFile;
use exprflower::adapters::console_log;
use exprflower::adapters::log_sink::LogEventSink;
use exprflower::adapters::sim::{SimLeds, SimMotor};
use exprflower::app::commands::AppCommand;
use exprflower::app::ports::ConfigPort;
use exprflower::config::FlowerConfig;
use exprflower::faces::FaceObservation;
use exprflower::tracker::FaceTracker;

#[derive(Parser)]
#[command(name = "flower-sim", about = "Replay a face-detection scenario against a simulated flower")]
struct Cli {
    /// JSON config file.  Defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario: a JSON array of `{ "hold_ms": .., "faces": [..] }` frames.
    scenario: PathBuf,
}

/// One camera frame of a scenario.
#[derive(Debug, Deserialize)]
struct ScenarioFrame {
    /// How long the frame stays current before the next one arrives.
    #[serde(default)]
    hold_ms: u64,
    #[serde(default)]
    faces: Vec<FaceObservation>,
    /// Commands applied before the faces are processed.
    #[serde(default)]
    commands: Vec<AppCommand>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = console_log::init().map_err(|e| anyhow!("installing console logger: {e}"))?;
    info!("flower-sim starting (log filter {})", filter);

    let config = match &cli.config {
        Some(path) => JsonConfigFile::new(path)
            .load()
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FlowerConfig::default(),
    };
    let frames = load_scenario(&cli.scenario)?;
    info!("Scenario: {} frames from {}", frames.len(), cli.scenario.display());

    let service = FlowerService::new(
        Box::new(SimMotor::new()),
        Box::new(SimLeds::new(config.led_count)),
        config.clone(),
        Box::new(LogEventSink::new()),
    );
    service.start();

    let mut tracker = FaceTracker::new(&config);
    for frame in frames {
        for cmd in frame.commands {
            service.handle_command(cmd);
        }
        let report = tracker.process_frame(&frame.faces, &service);
        info!(
            "Frame {:>4} | {:?} ({:?}) | priority={:?} | expressions={:?} | state={} opening={:.2}",
            report.frame,
            report.stimulus,
            report.ambient,
            report.priority.map(|id| id.0),
            report.expressions.as_slice(),
            service.current_state(),
            service.opening(),
        );
        thread::sleep(Duration::from_millis(frame.hold_ms));
    }

    info!(
        "Scenario done: state={} underlying={:?} opening={:.2}",
        service.current_state(),
        service.underlying_state(),
        service.opening()
    );
    service.shutdown();
    Ok(())
}

fn load_scenario(path: &Path) -> Result<Vec<ScenarioFrame>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| anyhow!("parsing scenario {}: {e}", path.display()))
}
