//! Per-frame gesture evaluation.

use facegym_face_model::{MetricSnapshot, StepId, ThresholdConfig};

/// Whether `metrics` satisfy the gesture for `step` this frame.
///
/// All comparisons are strict; a value equal to its threshold is not
/// satisfied. Blink additionally requires `EAR > 0`, because a frame with
/// missing eye landmarks reads as EAR 0 and must never count as a blink.
pub fn is_satisfied(step: StepId, metrics: &MetricSnapshot, thresholds: &ThresholdConfig) -> bool {
    match step {
        StepId::Blink => metrics.ear > 0.0 && metrics.ear < thresholds.blink_ear_max,
        StepId::Smile => metrics.mar > thresholds.smile_mar_min,
        StepId::BrowRaise => metrics.eb > thresholds.brow_eb_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(ear: f64, mar: f64, eb: f64) -> MetricSnapshot {
        MetricSnapshot { ear, mar, eb }
    }

    #[test]
    fn test_blink_below_threshold() {
        let t = ThresholdConfig::default();
        assert!(is_satisfied(StepId::Blink, &snapshot(0.15, 0.0, 0.0), &t));
        assert!(!is_satisfied(StepId::Blink, &snapshot(0.35, 0.0, 0.0), &t));
    }

    #[test]
    fn test_zero_ear_never_blinks() {
        let t = ThresholdConfig {
            blink_ear_max: 0.5,
            ..Default::default()
        };
        assert!(!is_satisfied(StepId::Blink, &snapshot(0.0, 0.0, 0.0), &t));
    }

    #[test]
    fn test_boundaries_are_strict() {
        let t = ThresholdConfig::default();
        assert!(!is_satisfied(
            StepId::Blink,
            &snapshot(t.blink_ear_max, 0.0, 0.0),
            &t
        ));
        assert!(!is_satisfied(
            StepId::Smile,
            &snapshot(0.0, t.smile_mar_min, 0.0),
            &t
        ));
        assert!(!is_satisfied(
            StepId::BrowRaise,
            &snapshot(0.0, 0.0, t.brow_eb_min),
            &t
        ));
    }

    #[test]
    fn test_each_step_reads_its_own_metric() {
        let t = ThresholdConfig::default();
        let smiling = snapshot(0.32, 0.5, 18.0);
        assert!(is_satisfied(StepId::Smile, &smiling, &t));
        assert!(!is_satisfied(StepId::Blink, &smiling, &t));
        assert!(!is_satisfied(StepId::BrowRaise, &smiling, &t));

        let raised = snapshot(0.32, 0.1, 30.0);
        assert!(is_satisfied(StepId::BrowRaise, &raised, &t));
        assert!(!is_satisfied(StepId::Smile, &raised, &t));
    }

    proptest! {
        #[test]
        fn evaluation_is_total_and_pure(
            ear in -1.0f64..2.0,
            mar in -1.0f64..2.0,
            eb in -10.0f64..100.0,
            step in prop_oneof![Just(StepId::Blink), Just(StepId::Smile), Just(StepId::BrowRaise)],
        ) {
            let t = ThresholdConfig::default();
            let m = snapshot(ear, mar, eb);
            prop_assert_eq!(is_satisfied(step, &m, &t), is_satisfied(step, &m, &t));
            if step == StepId::Blink && ear <= 0.0 {
                prop_assert!(!is_satisfied(step, &m, &t));
            }
        }
    }
}
