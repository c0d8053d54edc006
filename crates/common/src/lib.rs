//! FaceGym Common Utilities
//!
//! Shared infrastructure for all FaceGym crates:
//! - Error types and result aliases
//! - Session clock
//! - Tracing/logging initialization
//! - Configuration loading and boundary validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
