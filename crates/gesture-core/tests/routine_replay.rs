use std::path::PathBuf;

use facegym_face_model::{is_last_step, load_frames, step_at, LandmarkFrame, ThresholdConfig};
use facegym_gesture_core::{extract_metrics, is_satisfied, ConfirmationFilter};

fn load_fixture_frames() -> Vec<LandmarkFrame> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("frames.jsonl");

    load_frames(&path).expect("fixture frames should parse")
}

/// Walk the routine over the recording without rests and return the frame
/// index at which each step was confirmed.
fn confirmation_frames(frames: &[LandmarkFrame], thresholds: &ThresholdConfig) -> Vec<usize> {
    let mut filter = ConfirmationFilter::new(thresholds.frames_required);
    let mut step = 0;
    let mut confirmed = Vec::new();

    for (i, frame) in frames.iter().enumerate() {
        let satisfied = frame
            .landmarks()
            .map(|set| is_satisfied(step_at(step).id, &extract_metrics(&set), thresholds))
            .unwrap_or(false);

        if filter.observe(satisfied) {
            confirmed.push(i);
            if is_last_step(step) {
                break;
            }
            step += 1;
        }
    }
    confirmed
}

#[test]
fn default_thresholds_confirm_each_step_once() {
    let frames = load_fixture_frames();
    assert_eq!(frames.len(), 36);

    let confirmed = confirmation_frames(&frames, &ThresholdConfig::default());
    // Stray single blink at 10 and the dropout at 22 both restart the run.
    assert_eq!(confirmed, vec![15, 25, 32]);
}

#[test]
fn shorter_run_confirms_earlier() {
    let frames = load_fixture_frames();
    let thresholds = ThresholdConfig {
        frames_required: 2,
        ..Default::default()
    };
    assert_eq!(confirmation_frames(&frames, &thresholds), vec![14, 21, 31]);
}

#[test]
fn tight_blink_threshold_blocks_routine() {
    let frames = load_fixture_frames();
    let thresholds = ThresholdConfig {
        blink_ear_max: 0.05,
        ..Default::default()
    };
    assert!(confirmation_frames(&frames, &thresholds).is_empty());
}

#[test]
fn neutral_frames_satisfy_nothing() {
    let frames = load_fixture_frames();
    let thresholds = ThresholdConfig::default();
    let neutral = frames[0].landmarks().expect("first frame has a face");
    let metrics = extract_metrics(&neutral);

    for step in 0..3 {
        assert!(!is_satisfied(step_at(step).id, &metrics, &thresholds));
    }
}
