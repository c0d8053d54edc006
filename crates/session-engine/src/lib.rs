//! # FaceGym Session
//!
//! Runs the guided facial-exercise routine for one user.
//!
//! ## Architecture
//!
//! ```text
//! LandmarkFrameSource ──frame──▶ SessionDriver (tokio task)
//!                                  │  SessionStateMachine
//!                                  │    ├─ extract_metrics / is_satisfied
//!                                  │    └─ ConfirmationFilter
//!                                  │  RestScheduler (1 s countdown)
//!                                  ▼
//!                      FeedbackSink + Announcer
//! ```
//!
//! The state machine is synchronous and testable on its own; the driver
//! owns timers and the source, and serializes everything through one
//! `select!` loop driven by [`SessionHandle`] commands.

pub mod calibrate;
pub mod driver;
pub mod feedback;
pub mod machine;
pub mod rest;
pub mod source;

pub use calibrate::sample_calibration;
pub use driver::{spawn_session, SessionConfig, SessionHandle};
pub use feedback::{
    Announcer, ChannelSink, Feedback, FeedbackSink, JsonLinesSink, LogAnnouncer, LogSink,
    SessionStatus, SilentAnnouncer,
};
pub use machine::{RestCommand, SessionState, SessionStateMachine, Update, COMPLETION_BONUS};
pub use rest::RestScheduler;
pub use source::{Frame, LandmarkFrameSource, ReplaySource};
