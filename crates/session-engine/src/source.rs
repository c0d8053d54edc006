//! Landmark frame sources.
//!
//! The session does not know about cameras or detection models. It binds a
//! [`LandmarkFrameSource`] on Start, pulls one frame per tick, and releases
//! the source on Stop.

use std::collections::VecDeque;

use facegym_common::error::{FaceGymError, FaceGymResult};
use facegym_face_model::{LandmarkFrame, LandmarkSet};

/// One detector result.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A face was found.
    Face(LandmarkSet),
    /// The detector ran but saw no face. Not an error.
    NoFace,
}

/// Trait for landmark providers (camera + detector, recordings, test scripts).
#[async_trait::async_trait]
pub trait LandmarkFrameSource: Send {
    /// Bind the camera and load the detector. Called once per Start.
    async fn acquire(&mut self) -> FaceGymResult<()>;

    /// Run detection for the next frame.
    ///
    /// An `Err` is a transient detector fault; the session logs it and skips
    /// the frame.
    async fn next_frame(&mut self) -> FaceGymResult<Frame>;

    /// Release the camera binding.
    async fn release(&mut self) {}

    /// Whether the source can never produce another face (end of recording).
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Plays back a recorded landmark stream, one frame per request.
///
/// Once the recording runs out every request yields [`Frame::NoFace`] and
/// [`LandmarkFrameSource::is_exhausted`] turns true.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: VecDeque<LandmarkFrame>,
    delivered: usize,
}

impl ReplaySource {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames: frames.into(),
            delivered: 0,
        }
    }

    /// Frames handed out so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

#[async_trait::async_trait]
impl LandmarkFrameSource for ReplaySource {
    async fn acquire(&mut self) -> FaceGymResult<()> {
        if self.frames.is_empty() {
            return Err(FaceGymError::acquisition("Recording contains no frames"));
        }
        tracing::info!(frames = self.frames.len(), "Replay source ready");
        Ok(())
    }

    async fn next_frame(&mut self) -> FaceGymResult<Frame> {
        let Some(frame) = self.frames.pop_front() else {
            return Ok(Frame::NoFace);
        };
        self.delivered += 1;
        Ok(match frame.landmarks() {
            Some(set) => Frame::Face(set),
            None => Frame::NoFace,
        })
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegym_face_model::{mesh, Landmark};

    #[tokio::test]
    async fn test_replay_yields_frames_in_order_then_no_face() {
        let set = LandmarkSet::from_indexed([(mesh::MOUTH_TOP, Landmark::new(1.0, 1.0))]);
        let mut source = ReplaySource::new(vec![
            LandmarkFrame::with_face(0, &set),
            LandmarkFrame::no_face(33),
        ]);
        source.acquire().await.unwrap();

        assert_eq!(source.next_frame().await.unwrap(), Frame::Face(set));
        assert!(!source.is_exhausted());
        assert_eq!(source.next_frame().await.unwrap(), Frame::NoFace);
        assert!(source.is_exhausted());
        assert_eq!(source.next_frame().await.unwrap(), Frame::NoFace);
        assert_eq!(source.delivered(), 2);
    }

    #[tokio::test]
    async fn test_empty_recording_fails_acquisition() {
        let mut source = ReplaySource::new(Vec::new());
        assert!(matches!(
            source.acquire().await,
            Err(FaceGymError::Acquisition { .. })
        ));
    }
}
