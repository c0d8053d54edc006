//! Face landmarks and the detector indexing contract.
//!
//! Landmarks are expressed in frame-pixel space. Detectors typically emit
//! coordinates normalized to `[0.0, 1.0]`; use [`LandmarkSet::from_normalized`]
//! to convert them before computing metrics, otherwise pixel-valued thresholds
//! (eyebrow distance) are meaningless.

use serde::{Deserialize, Serialize};

/// Anatomical landmark indices for the 478-point face mesh.
///
/// This is the only place detector indices appear. Switching to a detector
/// with a different topology means updating this module and nothing else.
pub mod mesh {
    /// Total number of points emitted per face.
    pub const MESH_LANDMARK_COUNT: usize = 478;

    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;

    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_EYE_OUTER: usize = 263;

    pub const MOUTH_TOP: usize = 13;
    pub const MOUTH_BOTTOM: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;

    pub const LEFT_BROW: usize = 70;
    pub const RIGHT_BROW: usize = 300;

    /// Every index the gesture engine reads.
    pub const TRACKED: [usize; 14] = [
        LEFT_EYE_TOP,
        LEFT_EYE_BOTTOM,
        LEFT_EYE_OUTER,
        LEFT_EYE_INNER,
        RIGHT_EYE_TOP,
        RIGHT_EYE_BOTTOM,
        RIGHT_EYE_INNER,
        RIGHT_EYE_OUTER,
        MOUTH_TOP,
        MOUTH_BOTTOM,
        MOUTH_LEFT,
        MOUTH_RIGHT,
        LEFT_BROW,
        RIGHT_BROW,
    ];
}

/// A single 2D landmark in frame-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark.
    pub fn distance_to(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two landmarks.
    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// One frame's landmarks for a single detected face.
///
/// Fixed-size and index-addressable; slots the detector did not fill are
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Option<Landmark>>,
}

impl LandmarkSet {
    /// An empty set where every landmark is missing.
    pub fn empty() -> Self {
        Self {
            points: vec![None; mesh::MESH_LANDMARK_COUNT],
        }
    }

    /// Build a set from `(index, landmark)` pairs. Out-of-range indices are ignored.
    pub fn from_indexed(points: impl IntoIterator<Item = (usize, Landmark)>) -> Self {
        let mut set = Self::empty();
        for (index, point) in points {
            set.set(index, point);
        }
        set
    }

    /// Build a set from a dense, detector-ordered list of pixel points.
    pub fn from_dense(points: &[Landmark]) -> Self {
        Self::from_indexed(points.iter().copied().enumerate())
    }

    /// Convert normalized detector output into frame-pixel space.
    pub fn from_normalized(points: &[(f64, f64)], width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self::from_indexed(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| (i, Landmark::new(x * w, y * h))),
        )
    }

    /// Landmark at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied().flatten()
    }

    /// Set the landmark at `index`. Returns false if the index is outside the mesh.
    pub fn set(&mut self, index: usize, point: Landmark) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = Some(point);
                true
            }
            None => false,
        }
    }

    /// Number of landmarks present.
    pub fn present(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Whether no landmark is present at all.
    pub fn is_empty(&self) -> bool {
        self.present() == 0
    }

    /// Iterate over present landmarks with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Landmark)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (i, p)))
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Scalar facial metrics derived from one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Eye aspect ratio, averaged over both eyes. Lower means more closed.
    pub ear: f64,
    /// Mouth aspect ratio. Higher means wider open.
    pub mar: f64,
    /// Eyebrow-to-eye-center distance in pixels, averaged over both sides.
    pub eb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_has_no_points() {
        let set = LandmarkSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.get(mesh::LEFT_EYE_TOP), None);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut set = LandmarkSet::empty();
        assert!(!set.set(mesh::MESH_LANDMARK_COUNT, Landmark::new(1.0, 1.0)));
        assert!(set.is_empty());
        assert_eq!(set.get(10_000), None);
    }

    #[test]
    fn test_from_normalized_scales_to_pixels() {
        let set = LandmarkSet::from_normalized(&[(0.5, 0.25), (1.0, 1.0)], 640, 480);
        assert_eq!(set.get(0), Some(Landmark::new(320.0, 120.0)));
        assert_eq!(set.get(1), Some(Landmark::new(640.0, 480.0)));
        assert_eq!(set.present(), 2);
    }

    #[test]
    fn test_from_dense_keeps_detector_order() {
        let points: Vec<Landmark> = (0..=mesh::LEFT_EYE_TOP)
            .map(|i| Landmark::new(i as f64, 2.0 * i as f64))
            .collect();
        let set = LandmarkSet::from_dense(&points);
        assert_eq!(set.present(), points.len());
        assert_eq!(
            set.get(mesh::LEFT_EYE_TOP),
            Some(Landmark::new(mesh::LEFT_EYE_TOP as f64, 2.0 * mesh::LEFT_EYE_TOP as f64))
        );
        assert_eq!(set.get(points.len()), None);
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.midpoint(&b), Landmark::new(1.5, 2.0));
    }

    #[test]
    fn test_tracked_indices_fit_mesh() {
        assert!(mesh::TRACKED
            .iter()
            .all(|&i| i < mesh::MESH_LANDMARK_COUNT));
    }
}
