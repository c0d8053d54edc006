//! Session state machine.
//!
//! ```text
//!            Start             acquired
//!   Idle ───────────▶ Loading ─────────▶ Running ◀──────────┐
//!    ▲                  │ failed           │  confirmed,    │ countdown
//!    └──────────────────┘                  │  not last      │ reaches 0
//!    ▲                                     ├──────────▶ Resting
//!    │ Stop (from any state)               │  confirmed, last
//!    └─────────────────────────────────────┴──────────▶ Done
//! ```
//!
//! The machine is synchronous and owns every piece of mutable session state.
//! Timers and I/O live in the driver, which applies the [`RestCommand`]
//! carried by each [`Update`].

use facegym_common::config::DisplayOptions;
use facegym_common::error::{FaceGymError, FaceGymResult};
use facegym_face_model::{
    is_last_step, step_at, LandmarkSet, MetricSnapshot, ThresholdConfig, ROUTINE_LEN,
};
use facegym_gesture_core::{extract_metrics, is_satisfied, CalibrationOutcome, ConfirmationFilter};

use crate::feedback::{Feedback, SessionStatus};

/// Points awarded for completing the routine.
pub const COMPLETION_BONUS: u32 = 3;

const IDLE_INSTRUCTION: &str = "Press Start and look at the camera";
const ACQUISITION_FAILED: &str = "Could not start camera or load model.";
const STOPPED: &str = "Stopped. Tap Start to try again.";
const COMPLETED: &str = "All done!";
const NO_FACE: &str = "I can't see your face. Move closer and look at the camera.";

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Always `< ROUTINE_LEN`.
    pub current_step_index: usize,
    pub consecutive_success_count: u32,
    /// Non-decreasing until Restart.
    pub score: u32,
    pub rest_seconds_remaining: u32,
    /// Step to resume at when the current rest ends.
    pub scheduled_step: Option<usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            current_step_index: 0,
            consecutive_success_count: 0,
            score: 0,
            rest_seconds_remaining: 0,
            scheduled_step: None,
        }
    }
}

/// Timer instruction for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestCommand {
    /// Start (or replace) a countdown of this many seconds.
    Start(u32),
    /// Cancel any active countdown.
    Cancel,
}

/// Result of one machine transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub feedback: Feedback,
    /// Phrase for the voice announcer, if the instruction changed.
    pub announcement: Option<String>,
    pub rest: Option<RestCommand>,
}

/// Orchestrates evaluation, confirmation and rest for one session.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    state: SessionState,
    thresholds: ThresholdConfig,
    display: DisplayOptions,
    filter: ConfirmationFilter,
    instruction: String,
    metrics: MetricSnapshot,
    satisfied: bool,
    face_detected: bool,
    has_run: bool,
}

impl SessionStateMachine {
    /// Thresholds pass through the same boundary validation as updates.
    pub fn new(thresholds: ThresholdConfig, display: DisplayOptions) -> FaceGymResult<Self> {
        let thresholds = thresholds.validated()?;
        Ok(Self {
            state: SessionState::default(),
            filter: ConfirmationFilter::new(thresholds.frames_required),
            thresholds,
            display,
            instruction: IDLE_INSTRUCTION.to_string(),
            metrics: MetricSnapshot::default(),
            satisfied: false,
            face_detected: false,
            has_run: false,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    /// Whether this session has ever reached Running.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Current feedback without changing anything.
    pub fn snapshot(&self) -> Feedback {
        self.feedback()
    }

    /// Idle → Loading.
    pub fn begin_start(&mut self) -> FaceGymResult<Update> {
        if self.state.status != SessionStatus::Idle {
            return Err(FaceGymError::session("Session already started"));
        }
        self.state = SessionState {
            status: SessionStatus::Loading,
            ..SessionState::default()
        };
        self.clear_frame_state();
        self.instruction = "Starting camera…".to_string();
        Ok(self.update(None, None))
    }

    /// Loading → Running at step 0.
    pub fn acquisition_succeeded(&mut self) -> FaceGymResult<Update> {
        if self.state.status != SessionStatus::Loading {
            return Err(FaceGymError::session("Session is not loading"));
        }
        self.has_run = true;
        Ok(self.enter_step(0, true))
    }

    /// Loading → Idle. No retry is attempted.
    pub fn acquisition_failed(&mut self, error: &FaceGymError) -> Update {
        tracing::warn!(%error, "Session acquisition failed");
        self.state = SessionState::default();
        self.clear_frame_state();
        self.instruction = ACQUISITION_FAILED.to_string();
        self.update(Some(ACQUISITION_FAILED.to_string()), None)
    }

    /// Evaluate one frame. `None` means no face was detected.
    ///
    /// Returns `None` when the session is not Running; frames are then
    /// ignored.
    pub fn on_frame(&mut self, landmarks: Option<&LandmarkSet>) -> Option<Update> {
        if self.state.status != SessionStatus::Running {
            return None;
        }

        let step = step_at(self.state.current_step_index);
        let notice = match landmarks {
            Some(set) => {
                self.face_detected = true;
                self.metrics = extract_metrics(set);
                self.satisfied = is_satisfied(step.id, &self.metrics, &self.thresholds);
                None
            }
            None => {
                self.face_detected = false;
                self.satisfied = false;
                Some(NO_FACE.to_string())
            }
        };

        let confirmed = self.filter.observe(self.satisfied);
        self.state.consecutive_success_count = self.filter.count();

        if !confirmed {
            let mut update = self.update(None, None);
            update.feedback.notice = notice;
            return Some(update);
        }

        tracing::info!(step = %step.id, index = self.state.current_step_index, "Step confirmed");
        let index = self.state.current_step_index;
        if is_last_step(index) {
            return Some(self.complete());
        }

        let next = index + 1;
        let rest_seconds = self.thresholds.rest_seconds;
        if rest_seconds == 0 {
            let mut update = self.enter_step(next, false);
            update.announcement = Some(format!("Great job. Next, {}", step_at(next).instruction));
            return Some(update);
        }

        self.filter.reset();
        self.satisfied = false;
        self.state.status = SessionStatus::Resting;
        self.state.consecutive_success_count = 0;
        self.state.scheduled_step = Some(next);
        self.state.rest_seconds_remaining = rest_seconds;
        self.instruction = rest_instruction(next, rest_seconds);
        let announcement = format!(
            "Great job. Next, {}, starting in {} seconds",
            step_at(next).instruction,
            rest_seconds
        );
        Some(self.update(Some(announcement), Some(RestCommand::Start(rest_seconds))))
    }

    /// Apply one countdown tick; `remaining` is what the timer reports.
    ///
    /// Resting → Running at the scheduled step when it reaches zero.
    pub fn on_rest_tick(&mut self, remaining: u32) -> Option<Update> {
        if self.state.status != SessionStatus::Resting {
            return None;
        }
        let next = self
            .state
            .scheduled_step
            .unwrap_or(self.state.current_step_index + 1)
            .min(ROUTINE_LEN - 1);

        if remaining > 0 {
            self.state.rest_seconds_remaining = remaining;
            self.instruction = rest_instruction(next, remaining);
            return Some(self.update(None, None));
        }
        Some(self.enter_step(next, false))
    }

    /// Any state → Idle. Returns `None` if already Idle.
    pub fn stop(&mut self) -> Option<Update> {
        if self.state.status == SessionStatus::Idle {
            return None;
        }
        tracing::info!(status = ?self.state.status, "Stopping session");
        self.state = SessionState::default();
        self.clear_frame_state();
        self.instruction = STOPPED.to_string();
        Some(self.update(None, Some(RestCommand::Cancel)))
    }

    /// Done / Running / Resting → Running at step 0 with the score cleared.
    ///
    /// Restarting from Idle needs the camera again; the driver handles that
    /// by running the Start sequence.
    pub fn restart(&mut self) -> FaceGymResult<Update> {
        match self.state.status {
            SessionStatus::Done | SessionStatus::Running | SessionStatus::Resting => {
                tracing::info!("Restarting routine");
                self.state.score = 0;
                let mut update = self.enter_step(0, true);
                update.rest = Some(RestCommand::Cancel);
                Ok(update)
            }
            SessionStatus::Idle => Err(FaceGymError::session("Session not started")),
            SessionStatus::Loading => Err(FaceGymError::session("Session is still loading")),
        }
    }

    /// Apply a finished calibration window.
    ///
    /// Only the blink threshold may change; step, score and status are left
    /// alone. Insufficient data keeps the previous threshold. Frames read
    /// during the window were not evaluated, so the confirmation run restarts
    /// either way.
    pub fn apply_calibration(&mut self, outcome: &CalibrationOutcome) -> FaceGymResult<Update> {
        self.filter.reset();
        self.satisfied = false;
        self.state.consecutive_success_count = 0;

        let notice = match *outcome {
            CalibrationOutcome::Applied {
                blink_ear_max,
                mean_ear,
                samples,
            } => {
                self.thresholds = self.thresholds.with_blink_ear_max(blink_ear_max)?;
                tracing::info!(
                    blink_ear_max = self.thresholds.blink_ear_max,
                    mean_ear,
                    samples,
                    "Blink threshold calibrated"
                );
                format!(
                    "Calibrated blink threshold to {:.2}",
                    self.thresholds.blink_ear_max
                )
            }
            CalibrationOutcome::InsufficientData { ticks } => {
                tracing::warn!(ticks, "Calibration saw no open eyes, keeping threshold");
                "Calibration needs your face in view with eyes open. Threshold unchanged."
                    .to_string()
            }
        };
        let mut update = self.update(Some(notice.clone()), None);
        update.feedback.notice = Some(notice);
        Ok(update)
    }

    /// Replace thresholds mid-session. The confirmation run restarts.
    pub fn update_thresholds(&mut self, thresholds: ThresholdConfig) -> FaceGymResult<Update> {
        self.thresholds = thresholds.validated()?;
        self.filter.set_required(self.thresholds.frames_required);
        self.state.consecutive_success_count = 0;
        Ok(self.update(None, None))
    }

    pub fn set_display(&mut self, display: DisplayOptions) -> Update {
        self.display = display;
        self.update(None, None)
    }

    fn enter_step(&mut self, index: usize, greeting: bool) -> Update {
        let step = step_at(index);
        self.filter.reset();
        self.satisfied = false;
        self.state.status = SessionStatus::Running;
        self.state.current_step_index = index.min(ROUTINE_LEN - 1);
        self.state.consecutive_success_count = 0;
        self.state.rest_seconds_remaining = 0;
        self.state.scheduled_step = None;
        self.instruction = step.instruction.to_string();
        let announcement = if greeting {
            format!("Let's begin. {}", step.instruction)
        } else {
            step.instruction.to_string()
        };
        self.update(Some(announcement), None)
    }

    fn complete(&mut self) -> Update {
        self.filter.reset();
        self.state.status = SessionStatus::Done;
        self.state.consecutive_success_count = 0;
        self.state.score += COMPLETION_BONUS;
        self.instruction = COMPLETED.to_string();
        tracing::info!(score = self.state.score, "Routine complete");
        self.update(Some("All done. Great work!".to_string()), None)
    }

    fn clear_frame_state(&mut self) {
        self.filter.reset();
        self.metrics = MetricSnapshot::default();
        self.satisfied = false;
        self.face_detected = false;
    }

    fn update(&self, announcement: Option<String>, rest: Option<RestCommand>) -> Update {
        Update {
            feedback: self.feedback(),
            announcement,
            rest,
        }
    }

    fn feedback(&self) -> Feedback {
        let index = self.state.current_step_index;
        Feedback {
            status: self.state.status,
            instruction: self.instruction.clone(),
            step: step_at(index).id,
            step_index: index,
            metrics: self.metrics,
            satisfied: self.satisfied,
            face_detected: self.face_detected,
            progress: (self.filter.count(), self.filter.required()),
            score: self.state.score,
            rest_seconds_remaining: self.state.rest_seconds_remaining,
            next_step: self.state.scheduled_step.map(|i| step_at(i).id),
            notice: None,
            simplified: self.display.simplified,
        }
    }
}

fn rest_instruction(next: usize, seconds: u32) -> String {
    format!(
        "Great job! Next: {} in {} sec…",
        step_at(next).instruction,
        seconds
    )
}
