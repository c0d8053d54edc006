//! Outward session feedback.
//!
//! Every state change produces a [`Feedback`] tuple for the display, and
//! optionally a phrase for the voice announcer. Both edges are best-effort:
//! the session never blocks on them or retries them.

use std::io::Write;

use facegym_common::logging::ANNOUNCE_TARGET;
use facegym_face_model::{MetricSnapshot, StepId};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No camera bound; waiting for Start.
    Idle,
    /// Acquiring camera and detector.
    Loading,
    /// Evaluating frames for the current step.
    Running,
    /// Paused between two steps.
    Resting,
    /// Routine completed.
    Done,
}

/// Everything the display needs to render one update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub status: SessionStatus,
    pub instruction: String,
    pub step: StepId,
    pub step_index: usize,
    pub metrics: MetricSnapshot,
    pub satisfied: bool,
    pub face_detected: bool,
    /// `(consecutive satisfied frames, frames required)`.
    pub progress: (u32, u32),
    pub score: u32,
    pub rest_seconds_remaining: u32,
    /// Step that follows the current rest, if resting.
    pub next_step: Option<StepId>,
    /// Transient message (no face, calibration result).
    pub notice: Option<String>,
    pub simplified: bool,
}

/// Receives feedback for rendering.
pub trait FeedbackSink: Send {
    fn emit(&mut self, feedback: &Feedback);
}

/// Speaks instruction changes. Failures are swallowed by the implementation.
pub trait Announcer: Send {
    fn announce(&mut self, text: &str);
}

/// Logs each update at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn emit(&mut self, feedback: &Feedback) {
        tracing::debug!(
            status = ?feedback.status,
            step = %feedback.step,
            satisfied = feedback.satisfied,
            score = feedback.score,
            rest = feedback.rest_seconds_remaining,
            instruction = %feedback.instruction,
            "Session feedback"
        );
    }
}

/// Forwards updates over an unbounded channel.
///
/// A closed receiver is not an error; updates are dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Feedback>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<Feedback>) -> Self {
        Self { tx }
    }
}

impl FeedbackSink for ChannelSink {
    fn emit(&mut self, feedback: &Feedback) {
        let _ = self.tx.send(feedback.clone());
    }
}

/// Writes each update as one JSON line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> FeedbackSink for JsonLinesSink<W> {
    fn emit(&mut self, feedback: &Feedback) {
        let written = serde_json::to_writer(&mut self.writer, feedback)
            .map_err(std::io::Error::other)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = written {
            tracing::warn!(error = %e, "Failed to write feedback");
        }
    }
}

/// Logs phrases under the `facegym::announce` target in place of speech.
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, text: &str) {
        tracing::info!(target: ANNOUNCE_TARGET, "{text}");
    }
}

/// Discards every phrase.
#[derive(Debug, Default)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Feedback {
        Feedback {
            status: SessionStatus::Resting,
            instruction: "Great job! Next: Smile in 3 sec…".to_string(),
            step: StepId::Blink,
            step_index: 0,
            metrics: MetricSnapshot::default(),
            satisfied: false,
            face_detected: true,
            progress: (0, 3),
            score: 0,
            rest_seconds_remaining: 3,
            next_step: Some(StepId::Smile),
            notice: None,
            simplified: true,
        }
    }

    #[test]
    fn test_json_lines_sink_writes_one_line() {
        let mut buf = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buf);
            sink.emit(&sample());
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["status"], "resting");
        assert_eq!(value["next_step"], "smile");
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.emit(&sample());
    }
}
