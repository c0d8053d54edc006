//! Print per-frame metrics for a recording.

use std::path::PathBuf;

use facegym_common::config::AppConfig;
use facegym_face_model::ROUTINE;
use facegym_gesture_core::{extract_metrics, is_satisfied};

pub fn run(config: AppConfig, path: PathBuf) -> anyhow::Result<()> {
    let config = config.sanitized()?;
    let thresholds = config.thresholds;
    let frames = super::read_frames(&path)?;

    println!(
        "Thresholds: EAR < {:.2}, MAR > {:.2}, EB > {:.1}px",
        thresholds.blink_ear_max, thresholds.smile_mar_min, thresholds.brow_eb_min
    );
    println!("{:>8}  {:>6}  {:>6}  {:>6}  satisfied", "t(ms)", "EAR", "MAR", "EB");

    let mut faces = 0;
    for frame in &frames {
        let Some(set) = frame.landmarks() else {
            println!("{:>8}  {:>6}  {:>6}  {:>6}  -", frame.timestamp_ms, "-", "-", "-");
            continue;
        };
        faces += 1;
        let metrics = extract_metrics(&set);
        let satisfied = ROUTINE
            .iter()
            .filter(|step| is_satisfied(step.id, &metrics, &thresholds))
            .map(|step| step.id.to_string())
            .collect::<Vec<_>>();
        println!(
            "{:>8}  {:>6.3}  {:>6.3}  {:>6.1}  {}",
            frame.timestamp_ms,
            metrics.ear,
            metrics.mar,
            metrics.eb,
            if satisfied.is_empty() {
                "-".to_string()
            } else {
                satisfied.join(",")
            }
        );
    }

    println!();
    println!("{} frames, {} with a face", frames.len(), faces);
    Ok(())
}
