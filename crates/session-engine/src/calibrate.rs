//! Timed calibration sampling against a live source.

use std::time::Duration;

use facegym_common::config::CalibrationSettings;
use facegym_gesture_core::{extract_metrics, CalibrationEngine, CalibrationOutcome};
use tokio::time::{sleep, timeout_at, Instant};

use crate::source::{Frame, LandmarkFrameSource};

/// Pull up to `sample_budget` frames from `source`, `sample_interval_ms`
/// apart, and derive a blink threshold from them.
///
/// The whole window is bounded by `timeout_ms`; a stalled detector ends the
/// window early with whatever was collected.
pub async fn sample_calibration(
    source: &mut dyn LandmarkFrameSource,
    settings: CalibrationSettings,
) -> CalibrationOutcome {
    let deadline = Instant::now() + Duration::from_millis(settings.timeout_ms);
    let interval = Duration::from_millis(settings.sample_interval_ms);
    let mut engine = CalibrationEngine::new(settings);

    tracing::info!(
        budget = settings.sample_budget,
        source = source.name(),
        "Calibration started"
    );

    while !engine.is_complete() {
        match timeout_at(deadline, source.next_frame()).await {
            Ok(Ok(Frame::Face(set))) => engine.record(Some(&extract_metrics(&set))),
            Ok(Ok(Frame::NoFace)) => engine.record(None),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Detection failed during calibration");
                engine.record(None);
            }
            Err(_) => {
                tracing::warn!(
                    samples = engine.valid_samples(),
                    "Calibration window timed out"
                );
                break;
            }
        }

        if engine.is_complete() {
            break;
        }
        if timeout_at(deadline, sleep(interval)).await.is_err() {
            break;
        }
    }

    engine.finish()
}
