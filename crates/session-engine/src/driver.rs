//! Session actor.
//!
//! One tokio task owns the [`SessionStateMachine`], the frame source and the
//! rest countdown. Callers talk to it through a cloneable [`SessionHandle`];
//! every command carries a oneshot reply. Frame evaluation, countdown ticks
//! and commands are serialized by a single `select!` loop, so a late timer
//! can never act on a session that has already been stopped.

use std::time::Duration;

use facegym_common::clock::SessionClock;
use facegym_common::config::{AppConfig, CalibrationSettings, DisplayOptions};
use facegym_common::error::{FaceGymError, FaceGymResult};
use facegym_face_model::ThresholdConfig;
use facegym_gesture_core::CalibrationOutcome;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::calibrate::sample_calibration;
use crate::feedback::{Announcer, Feedback, FeedbackSink, SessionStatus};
use crate::machine::{RestCommand, SessionStateMachine, Update};
use crate::rest::RestScheduler;
use crate::source::{Frame, LandmarkFrameSource};

const COMMAND_CAPACITY: usize = 32;

/// Static parameters of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub thresholds: ThresholdConfig,
    pub calibration: CalibrationSettings,
    pub display: DisplayOptions,
    /// Delay between detection ticks while running.
    pub frame_interval: Duration,
}

impl SessionConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            calibration: config.calibration,
            display: config.display,
            frame_interval: Duration::from_millis(config.pacing.frame_interval_ms.max(1)),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_app(&AppConfig::default())
    }
}

type Reply<T> = oneshot::Sender<T>;

#[derive(Debug)]
enum Command {
    Start(Reply<FaceGymResult<Feedback>>),
    Stop(Reply<Feedback>),
    Restart(Reply<FaceGymResult<Feedback>>),
    Calibrate(Reply<FaceGymResult<CalibrationOutcome>>),
    UpdateThresholds(ThresholdConfig, Reply<FaceGymResult<Feedback>>),
    SetDisplay(DisplayOptions, Reply<Feedback>),
    Snapshot(Reply<Feedback>),
    Shutdown,
}

/// Cloneable handle to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Acquire the source and begin the routine.
    pub async fn start(&self) -> FaceGymResult<Feedback> {
        self.request(Command::Start).await?
    }

    /// Stop the session and release the source. A no-op when idle.
    pub async fn stop(&self) -> FaceGymResult<Feedback> {
        self.request(Command::Stop).await
    }

    /// Begin the routine again from the first step with the score cleared.
    pub async fn restart(&self) -> FaceGymResult<Feedback> {
        self.request(Command::Restart).await?
    }

    /// Run one blink calibration window. Only valid while running.
    pub async fn calibrate(&self) -> FaceGymResult<CalibrationOutcome> {
        self.request(Command::Calibrate).await?
    }

    pub async fn update_thresholds(&self, thresholds: ThresholdConfig) -> FaceGymResult<Feedback> {
        self.request(|reply| Command::UpdateThresholds(thresholds, reply))
            .await?
    }

    pub async fn set_display(&self, display: DisplayOptions) -> FaceGymResult<Feedback> {
        self.request(|reply| Command::SetDisplay(display, reply))
            .await
    }

    /// Current feedback without changing anything.
    pub async fn snapshot(&self) -> FaceGymResult<Feedback> {
        self.request(Command::Snapshot).await
    }

    /// Stop the session and end the task.
    pub async fn shutdown(&self) -> FaceGymResult<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| closed())
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> FaceGymResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await.map_err(|_| closed())?;
        rx.await.map_err(|_| closed())
    }
}

fn closed() -> FaceGymError {
    FaceGymError::session("Session task has exited")
}

/// Spawn a session task on the current runtime.
///
/// Fails without spawning if the thresholds contain non-finite values.
pub fn spawn_session(
    config: SessionConfig,
    source: Box<dyn LandmarkFrameSource>,
    sink: Box<dyn FeedbackSink>,
    announcer: Box<dyn Announcer>,
) -> FaceGymResult<(SessionHandle, JoinHandle<()>)> {
    let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
    let driver = SessionDriver::new(config, source, sink, announcer)?;
    let task = tokio::spawn(driver.run(rx));
    Ok((SessionHandle { tx }, task))
}

struct SessionDriver {
    machine: SessionStateMachine,
    calibration: CalibrationSettings,
    frame_interval: Duration,
    source: Box<dyn LandmarkFrameSource>,
    sink: Box<dyn FeedbackSink>,
    announcer: Box<dyn Announcer>,
    rest: RestScheduler,
    clock: Option<SessionClock>,
}

impl SessionDriver {
    fn new(
        config: SessionConfig,
        source: Box<dyn LandmarkFrameSource>,
        sink: Box<dyn FeedbackSink>,
        announcer: Box<dyn Announcer>,
    ) -> FaceGymResult<Self> {
        Ok(Self {
            machine: SessionStateMachine::new(config.thresholds, config.display)?,
            calibration: config.calibration,
            frame_interval: config.frame_interval,
            source,
            sink,
            announcer,
            rest: RestScheduler::new(),
            clock: None,
        })
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        let mut frames = interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(source = self.source.name(), "Session task started");
        loop {
            let running = self.machine.status() == SessionStatus::Running;
            let resting = self.rest.is_active();

            tokio::select! {
                cmd = rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle(cmd).await,
                },
                _ = frames.tick(), if running => self.on_frame_tick().await,
                remaining = self.rest.tick(), if resting => {
                    if let Some(update) = self.machine.on_rest_tick(remaining) {
                        self.apply(update);
                    }
                }
            }
        }

        self.stop().await;
        tracing::debug!("Session task finished");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Start(reply) => {
                let _ = reply.send(self.start().await);
            }
            Command::Stop(reply) => {
                self.stop().await;
                let _ = reply.send(self.machine.snapshot());
            }
            Command::Restart(reply) => {
                let result = if self.machine.status() == SessionStatus::Idle && self.machine.has_run()
                {
                    self.start().await
                } else {
                    self.machine.restart().map(|update| {
                        self.clock = Some(SessionClock::start());
                        self.apply(update)
                    })
                };
                let _ = reply.send(result);
            }
            Command::Calibrate(reply) => {
                let _ = reply.send(self.calibrate().await);
            }
            Command::UpdateThresholds(thresholds, reply) => {
                let result = self
                    .machine
                    .update_thresholds(thresholds)
                    .map(|update| self.apply(update));
                let _ = reply.send(result);
            }
            Command::SetDisplay(display, reply) => {
                let update = self.machine.set_display(display);
                let _ = reply.send(self.apply(update));
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.machine.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    async fn start(&mut self) -> FaceGymResult<Feedback> {
        let update = self.machine.begin_start()?;
        self.apply(update);

        if let Err(e) = self.source.acquire().await {
            let update = self.machine.acquisition_failed(&e);
            self.apply(update);
            return Err(e);
        }

        tracing::info!(source = self.source.name(), "Session started");
        self.clock = Some(SessionClock::start());
        let update = self.machine.acquisition_succeeded()?;
        Ok(self.apply(update))
    }

    async fn stop(&mut self) {
        if let Some(update) = self.machine.stop() {
            self.apply(update);
            self.source.release().await;
            self.clock = None;
        }
    }

    async fn calibrate(&mut self) -> FaceGymResult<CalibrationOutcome> {
        if self.machine.status() != SessionStatus::Running {
            return Err(FaceGymError::calibration(
                "Calibration is only available while a step is running",
            ));
        }
        let outcome = sample_calibration(self.source.as_mut(), self.calibration).await;
        let update = self.machine.apply_calibration(&outcome)?;
        self.apply(update);
        Ok(outcome)
    }

    async fn on_frame_tick(&mut self) {
        let frame = match self.source.next_frame().await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(source = self.source.name(), error = %e, "Detection failed, skipping frame");
                return;
            }
        };

        let landmarks = match &frame {
            Frame::Face(set) => Some(set),
            Frame::NoFace => None,
        };
        if let Some(update) = self.machine.on_frame(landmarks) {
            let done = update.feedback.status == SessionStatus::Done;
            self.apply(update);
            if done {
                if let Some(clock) = &self.clock {
                    tracing::info!(
                        elapsed_secs = clock.elapsed_secs(),
                        started_at = clock.epoch_wall(),
                        "Routine finished"
                    );
                }
            }
        }

        if self.source.is_exhausted() && self.machine.status() == SessionStatus::Running {
            tracing::info!(source = self.source.name(), "Source exhausted, stopping session");
            self.stop().await;
        }
    }

    /// Push an update to the display, voice and timer edges.
    fn apply(&mut self, update: Update) -> Feedback {
        match update.rest {
            Some(RestCommand::Start(seconds)) => self.rest.start(seconds),
            Some(RestCommand::Cancel) => self.rest.cancel(),
            None => {}
        }
        self.sink.emit(&update.feedback);
        if let Some(text) = &update.announcement {
            if self.machine.display().voice {
                self.announcer.announce(text);
            }
        }
        update.feedback
    }
}
