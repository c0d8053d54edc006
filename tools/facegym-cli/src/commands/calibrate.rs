//! Derive a blink threshold from the start of a recording.

use std::path::PathBuf;

use facegym_common::config::AppConfig;
use facegym_gesture_core::CalibrationOutcome;
use facegym_session::{sample_calibration, LandmarkFrameSource, ReplaySource};

pub async fn run(config: AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let config = config.sanitized()?;
    let frames = super::read_frames(&path)?;

    let mut source = ReplaySource::new(frames);
    source.acquire().await?;
    let outcome = sample_calibration(&mut source, config.calibration).await;
    source.release().await;

    match outcome {
        CalibrationOutcome::Applied {
            blink_ear_max,
            mean_ear,
            samples,
        } => {
            let applied = config.thresholds.with_blink_ear_max(blink_ear_max)?;
            println!("Samples used: {samples}");
            println!("Mean open-eye EAR: {mean_ear:.3}");
            println!(
                "Calibrated blink threshold to {:.2} (was {:.2})",
                applied.blink_ear_max, config.thresholds.blink_ear_max
            );
        }
        CalibrationOutcome::InsufficientData { ticks } => {
            println!("No open-eye samples in the first {ticks} frames; threshold unchanged.");
        }
    }
    Ok(())
}
