//! Open-eye blink calibration.
//!
//! While the user looks at the camera with eyes open, EAR samples are
//! collected over a bounded window. The personalized blink ceiling is a fixed
//! fraction of their mean open-eye EAR, rounded to two decimals. Samples at or
//! below `min_valid_ear` are detection noise (no face, eyes occluded) and are
//! discarded.
//!
//! The caller owns the sampling loop and its timing; this type only decides
//! what a window of samples means.

use facegym_common::config::CalibrationSettings;
use facegym_face_model::MetricSnapshot;
use serde::Serialize;

/// Result of one calibration window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CalibrationOutcome {
    /// A new blink ceiling was derived.
    Applied {
        blink_ear_max: f64,
        mean_ear: f64,
        samples: usize,
    },
    /// No valid sample was seen; the threshold must stay unchanged.
    InsufficientData { ticks: u32 },
}

/// Accumulates one calibration window.
#[derive(Debug, Clone)]
pub struct CalibrationEngine {
    settings: CalibrationSettings,
    samples: Vec<f64>,
    ticks: u32,
}

impl CalibrationEngine {
    pub fn new(settings: CalibrationSettings) -> Self {
        Self {
            settings,
            samples: Vec::with_capacity(settings.sample_budget as usize),
            ticks: 0,
        }
    }

    /// Record one sample tick. `None` means no face was detected.
    pub fn record(&mut self, metrics: Option<&MetricSnapshot>) {
        self.ticks += 1;
        match metrics {
            Some(m) if m.ear > self.settings.min_valid_ear && m.ear.is_finite() => {
                self.samples.push(m.ear);
            }
            Some(m) => {
                tracing::trace!(ear = m.ear, "Discarding calibration sample");
            }
            None => {}
        }
    }

    /// Whether the sample budget has been spent.
    pub fn is_complete(&self) -> bool {
        self.ticks >= self.settings.sample_budget
    }

    /// Valid samples collected so far.
    pub fn valid_samples(&self) -> usize {
        self.samples.len()
    }

    /// Close the window and derive the threshold.
    pub fn finish(self) -> CalibrationOutcome {
        if self.samples.is_empty() {
            return CalibrationOutcome::InsufficientData { ticks: self.ticks };
        }
        let mean_ear = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        CalibrationOutcome::Applied {
            blink_ear_max: round_to_hundredths(mean_ear * self.settings.factor),
            mean_ear,
            samples: self.samples.len(),
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
