//! Facial metric extraction.
//!
//! All three metrics are ratios or distances over a handful of landmarks
//! named in [`facegym_face_model::mesh`]. A missing landmark or a zero-width
//! denominator zeroes the affected component instead of failing, so a
//! partially detected face simply reads as "not performing the gesture".

use facegym_face_model::{mesh, Landmark, LandmarkSet, MetricSnapshot};

/// Compute EAR, MAR and eyebrow distance for one frame.
pub fn extract_metrics(set: &LandmarkSet) -> MetricSnapshot {
    let left_ear = aspect_ratio(
        set.get(mesh::LEFT_EYE_TOP),
        set.get(mesh::LEFT_EYE_BOTTOM),
        set.get(mesh::LEFT_EYE_OUTER),
        set.get(mesh::LEFT_EYE_INNER),
    );
    let right_ear = aspect_ratio(
        set.get(mesh::RIGHT_EYE_TOP),
        set.get(mesh::RIGHT_EYE_BOTTOM),
        set.get(mesh::RIGHT_EYE_INNER),
        set.get(mesh::RIGHT_EYE_OUTER),
    );

    let mar = aspect_ratio(
        set.get(mesh::MOUTH_TOP),
        set.get(mesh::MOUTH_BOTTOM),
        set.get(mesh::MOUTH_LEFT),
        set.get(mesh::MOUTH_RIGHT),
    );

    let left_eb = brow_distance(
        set.get(mesh::LEFT_BROW),
        set.get(mesh::LEFT_EYE_OUTER),
        set.get(mesh::LEFT_EYE_INNER),
    );
    let right_eb = brow_distance(
        set.get(mesh::RIGHT_BROW),
        set.get(mesh::RIGHT_EYE_INNER),
        set.get(mesh::RIGHT_EYE_OUTER),
    );

    MetricSnapshot {
        ear: (left_ear + right_ear) / 2.0,
        mar,
        eb: (left_eb + right_eb) / 2.0,
    }
}

/// Vertical opening over horizontal width.
fn aspect_ratio(
    top: Option<Landmark>,
    bottom: Option<Landmark>,
    left: Option<Landmark>,
    right: Option<Landmark>,
) -> f64 {
    let (Some(top), Some(bottom), Some(left), Some(right)) = (top, bottom, left, right) else {
        return 0.0;
    };
    let width = left.distance_to(&right);
    if width > 0.0 && width.is_finite() {
        top.distance_to(&bottom) / width
    } else {
        0.0
    }
}

/// Distance from a brow point to the midpoint of its eye corners.
fn brow_distance(
    brow: Option<Landmark>,
    corner_a: Option<Landmark>,
    corner_b: Option<Landmark>,
) -> f64 {
    match (brow, corner_a, corner_b) {
        (Some(brow), Some(a), Some(b)) => brow.distance_to(&a.midpoint(&b)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Eyes 30px wide, open `eye_open` px; mouth 60px wide, open `mouth_open`
    /// px; brows `brow_height` px above the eye centers.
    fn face(eye_open: f64, mouth_open: f64, brow_height: f64) -> LandmarkSet {
        LandmarkSet::from_indexed([
            (mesh::LEFT_EYE_OUTER, Landmark::new(100.0, 200.0)),
            (mesh::LEFT_EYE_INNER, Landmark::new(130.0, 200.0)),
            (mesh::LEFT_EYE_TOP, Landmark::new(115.0, 200.0 - eye_open / 2.0)),
            (mesh::LEFT_EYE_BOTTOM, Landmark::new(115.0, 200.0 + eye_open / 2.0)),
            (mesh::RIGHT_EYE_INNER, Landmark::new(170.0, 200.0)),
            (mesh::RIGHT_EYE_OUTER, Landmark::new(200.0, 200.0)),
            (mesh::RIGHT_EYE_TOP, Landmark::new(185.0, 200.0 - eye_open / 2.0)),
            (mesh::RIGHT_EYE_BOTTOM, Landmark::new(185.0, 200.0 + eye_open / 2.0)),
            (mesh::MOUTH_LEFT, Landmark::new(120.0, 300.0)),
            (mesh::MOUTH_RIGHT, Landmark::new(180.0, 300.0)),
            (mesh::MOUTH_TOP, Landmark::new(150.0, 300.0 - mouth_open / 2.0)),
            (mesh::MOUTH_BOTTOM, Landmark::new(150.0, 300.0 + mouth_open / 2.0)),
            (mesh::LEFT_BROW, Landmark::new(115.0, 200.0 - brow_height)),
            (mesh::RIGHT_BROW, Landmark::new(185.0, 200.0 - brow_height)),
        ])
    }

    #[test]
    fn test_metrics_from_known_geometry() {
        let m = extract_metrics(&face(9.0, 12.0, 25.0));
        assert!((m.ear - 0.3).abs() < 1e-9);
        assert!((m.mar - 0.2).abs() < 1e-9);
        assert!((m.eb - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_set_yields_zeros() {
        assert_eq!(
            extract_metrics(&LandmarkSet::empty()),
            MetricSnapshot::default()
        );
    }

    #[test]
    fn test_one_missing_eye_halves_ear() {
        let mut set = LandmarkSet::from_indexed(face(9.0, 12.0, 25.0).iter().filter(
            |(i, _)| *i != mesh::RIGHT_EYE_TOP,
        ));
        let m = extract_metrics(&set);
        assert!((m.ear - 0.15).abs() < 1e-9);

        // Collapse the mouth width to zero: MAR must read 0, not inf/NaN.
        set.set(mesh::MOUTH_RIGHT, Landmark::new(120.0, 300.0));
        assert_eq!(extract_metrics(&set).mar, 0.0);
    }

    #[test]
    fn test_missing_brow_zeroes_that_side() {
        let set = LandmarkSet::from_indexed(
            face(9.0, 12.0, 30.0)
                .iter()
                .filter(|(i, _)| *i != mesh::LEFT_BROW),
        );
        assert!((extract_metrics(&set).eb - 15.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn extraction_is_deterministic_and_finite(
            eye in 0.0f64..40.0,
            mouth in 0.0f64..80.0,
            brow in 0.0f64..80.0,
        ) {
            let set = face(eye, mouth, brow);
            let a = extract_metrics(&set);
            let b = extract_metrics(&set);
            prop_assert_eq!(a, b);
            prop_assert!(a.ear.is_finite() && a.ear >= 0.0);
            prop_assert!(a.mar.is_finite() && a.mar >= 0.0);
            prop_assert!(a.eb.is_finite() && a.eb >= 0.0);
        }
    }
}
