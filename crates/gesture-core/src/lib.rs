//! FaceGym Gesture Core
//!
//! Turns per-frame face landmarks into exercise decisions:
//! - **Metrics:** EAR / MAR / eyebrow distance from raw landmark coordinates
//! - **Evaluation:** Whether the current step's gesture is held this frame
//! - **Confirmation:** Hysteresis that requires a sustained run of frames
//! - **Calibration:** Personalized blink threshold from open-eye samples
//!
//! This crate is pure computation. It does no I/O and owns no timers.
//! All inputs are data; all outputs are data.

pub mod calibration;
pub mod confirmation;
pub mod evaluator;
pub mod metrics;

pub use calibration::{CalibrationEngine, CalibrationOutcome};
pub use confirmation::ConfirmationFilter;
pub use evaluator::is_satisfied;
pub use metrics::extract_metrics;
