//! Replay a recorded landmark stream through a full session.

use std::path::PathBuf;
use std::time::Duration;

use facegym_common::config::AppConfig;
use facegym_face_model::ROUTINE_LEN;
use facegym_gesture_core::CalibrationOutcome;
use facegym_session::{
    spawn_session, ChannelSink, Feedback, LogAnnouncer, ReplaySource, SessionConfig,
    SessionStatus,
};

pub struct RunOptions {
    pub frames: PathBuf,
    pub frames_required: Option<u32>,
    pub rest_seconds: Option<u32>,
    pub voice: bool,
    pub detailed: bool,
    pub json: bool,
    pub calibrate_after_ms: Option<u64>,
}

pub async fn run(mut config: AppConfig, options: RunOptions) -> anyhow::Result<()> {
    if let Some(n) = options.frames_required {
        config.thresholds.frames_required = n;
    }
    if let Some(s) = options.rest_seconds {
        config.thresholds.rest_seconds = s;
    }
    config.display.voice = options.voice;
    config.display.simplified = !options.detailed;
    let config = config.sanitized()?;

    let frames = super::read_frames(&options.frames)?;
    println!(
        "Replaying {} frames from {}",
        frames.len(),
        options.frames.display()
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let (handle, task) = spawn_session(
        SessionConfig::from_app(&config),
        Box::new(ReplaySource::new(frames)),
        Box::new(ChannelSink::new(tx)),
        Box::new(LogAnnouncer),
    )?;

    handle.start().await?;

    if let Some(delay) = options.calibrate_after_ms {
        let calibrator = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            match calibrator.calibrate().await {
                Ok(CalibrationOutcome::Applied { blink_ear_max, .. }) => {
                    tracing::info!(blink_ear_max, "Calibration applied");
                }
                Ok(CalibrationOutcome::InsufficientData { ticks }) => {
                    tracing::warn!(ticks, "Calibration collected no usable samples");
                }
                Err(e) => tracing::warn!(error = %e, "Calibration skipped"),
            }
        });
    }

    let mut printer = Printer::new(options.json, options.detailed);
    let mut last = None;
    while let Some(feedback) = rx.recv().await {
        printer.print(&feedback)?;
        let status = feedback.status;
        last = Some(feedback);
        if matches!(status, SessionStatus::Done | SessionStatus::Idle) {
            break;
        }
    }

    handle.shutdown().await?;
    task.await?;

    if let Some(feedback) = last {
        println!();
        match feedback.status {
            SessionStatus::Done => println!("Routine complete. Score: {}", feedback.score),
            _ => println!(
                "Recording ended at step {} of {}. Score: {}",
                feedback.step_index + 1,
                ROUTINE_LEN,
                feedback.score
            ),
        }
    }
    Ok(())
}

struct Printer {
    json: bool,
    detailed: bool,
    last_line: String,
}

impl Printer {
    fn new(json: bool, detailed: bool) -> Self {
        Self {
            json,
            detailed,
            last_line: String::new(),
        }
    }

    fn print(&mut self, feedback: &Feedback) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(feedback)?);
            return Ok(());
        }

        let mut line = format!("[{:?}] {}", feedback.status, feedback.instruction);
        if let Some(notice) = &feedback.notice {
            line.push_str(&format!(" ({notice})"));
        }
        if self.detailed {
            line.push_str(&format!(
                "  EAR {:.3} MAR {:.3} EB {:.1}  {}/{}  score {}",
                feedback.metrics.ear,
                feedback.metrics.mar,
                feedback.metrics.eb,
                feedback.progress.0,
                feedback.progress.1,
                feedback.score
            ));
        }

        // Simplified output only shows changes.
        if self.detailed || line != self.last_line {
            println!("{line}");
        }
        self.last_line = line;
        Ok(())
    }
}
