//! Recorded landmark frame streams.
//!
//! A recording is JSONL: one [`LandmarkFrame`] per line, `#` lines are
//! comments. Only the landmarks a recording cares about need to be present;
//! points are stored sparsely as `[index, x, y]` triples.
//!
//! ```text
//! # facegym frames v1
//! {"t":0,"face":{"points":[[159,210.0,180.0],[145,210.0,192.0]]}}
//! {"t":33,"face":null}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::landmark::{Landmark, LandmarkSet};

/// Milliseconds since the start of a recording.
pub type TimestampMs = u64;

/// A single recorded detector result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    /// Detected face, or `None` when the detector saw no face.
    pub face: Option<FaceLandmarks>,
}

/// Sparse landmark payload for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Points are `[0, 1]` detector output rather than pixels.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub normalized: bool,

    /// Frame width in pixels; required when `normalized` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Frame height in pixels; required when `normalized` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// `(index, x, y)` triples.
    pub points: Vec<(usize, f64, f64)>,
}

impl LandmarkFrame {
    /// A frame with a face in pixel space.
    pub fn with_face(timestamp_ms: TimestampMs, set: &LandmarkSet) -> Self {
        Self {
            timestamp_ms,
            face: Some(FaceLandmarks {
                normalized: false,
                width: None,
                height: None,
                points: set.iter().map(|(i, p)| (i, p.x, p.y)).collect(),
            }),
        }
    }

    /// A frame where no face was detected.
    pub fn no_face(timestamp_ms: TimestampMs) -> Self {
        Self {
            timestamp_ms,
            face: None,
        }
    }

    /// Landmarks in frame-pixel space, or `None` if no face was recorded.
    ///
    /// Normalized payloads without frame dimensions are treated as no face.
    pub fn landmarks(&self) -> Option<LandmarkSet> {
        let face = self.face.as_ref()?;
        if face.points.is_empty() {
            return None;
        }

        let (sx, sy) = if face.normalized {
            match (face.width, face.height) {
                (Some(w), Some(h)) => (w as f64, h as f64),
                _ => {
                    tracing::warn!(
                        t = self.timestamp_ms,
                        "Normalized frame without dimensions, skipping"
                    );
                    return None;
                }
            }
        } else {
            (1.0, 1.0)
        };

        Some(LandmarkSet::from_indexed(
            face.points
                .iter()
                .map(|&(i, x, y)| (i, Landmark::new(x * sx, y * sy))),
        ))
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| ModelError::ParseError { line, source })
        })
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

/// Load and parse a JSONL recording from disk.
pub fn load_frames(path: &Path) -> Result<Vec<LandmarkFrame>, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_frames(&content)
}
