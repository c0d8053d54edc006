pub mod calibrate;
pub mod config;
pub mod metrics;
pub mod run;

use std::path::Path;

use facegym_face_model::{load_frames, LandmarkFrame};

pub(crate) fn read_frames(path: &Path) -> anyhow::Result<Vec<LandmarkFrame>> {
    let frames =
        load_frames(path).map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", path.display()))?;
    tracing::debug!(frames = frames.len(), path = %path.display(), "Loaded recording");
    Ok(frames)
}
