//! FaceGym Face Model
//!
//! Defines the data contracts shared by the gesture engine and its edges:
//! - **Landmarks:** Indexed 2D face points in frame-pixel space, plus the
//!   indexing contract that ties anatomical names to detector indices
//! - **Frames:** Recorded landmark streams (JSONL) for camera-less replay
//! - **Routine:** The fixed blink / smile / eyebrow-raise step sequence
//! - **Thresholds:** Per-session gesture thresholds and their allowed ranges
//!
//! This crate performs no detection itself; landmarks are produced by an
//! external face-mesh model.

pub mod error;
pub mod frame;
pub mod landmark;
pub mod routine;
pub mod thresholds;

pub use error::*;
pub use frame::*;
pub use landmark::*;
pub use routine::*;
pub use thresholds::*;
