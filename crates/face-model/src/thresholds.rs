//! Gesture thresholds and their allowed ranges.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Allowed range for the blink EAR ceiling.
pub const BLINK_EAR_RANGE: RangeInclusive<f64> = 0.05..=0.50;
/// Allowed range for the smile MAR floor.
pub const SMILE_MAR_RANGE: RangeInclusive<f64> = 0.20..=0.70;
/// Allowed range for the eyebrow distance floor (pixels).
pub const BROW_EB_RANGE: RangeInclusive<f64> = 10.0..=60.0;
/// Allowed range for the confirmation run length.
pub const FRAMES_REQUIRED_RANGE: RangeInclusive<u32> = 2..=12;
/// Allowed range for the pause between steps (seconds).
pub const REST_SECONDS_RANGE: RangeInclusive<u32> = 0..=10;

/// Thresholds shared by every step of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Blink is satisfied while `0 < EAR < blink_ear_max`.
    pub blink_ear_max: f64,

    /// Smile is satisfied while `MAR > smile_mar_min`.
    pub smile_mar_min: f64,

    /// Eyebrow raise is satisfied while `EB > brow_eb_min` (pixels).
    pub brow_eb_min: f64,

    /// Consecutive satisfied frames needed to confirm a step.
    pub frames_required: u32,

    /// Pause between confirmed steps. Zero skips the rest entirely.
    pub rest_seconds: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            blink_ear_max: 0.30,
            smile_mar_min: 0.35,
            brow_eb_min: 22.0,
            frames_required: 3,
            rest_seconds: 4,
        }
    }
}

impl ThresholdConfig {
    /// Validate at the configuration boundary.
    ///
    /// Non-finite values are rejected. Finite values outside their range are
    /// clamped into it.
    pub fn validated(self) -> Result<Self, ModelError> {
        Ok(Self {
            blink_ear_max: clamp_f64("blink_ear_max", self.blink_ear_max, BLINK_EAR_RANGE)?,
            smile_mar_min: clamp_f64("smile_mar_min", self.smile_mar_min, SMILE_MAR_RANGE)?,
            brow_eb_min: clamp_f64("brow_eb_min", self.brow_eb_min, BROW_EB_RANGE)?,
            frames_required: clamp_u32(
                "frames_required",
                self.frames_required,
                FRAMES_REQUIRED_RANGE,
            ),
            rest_seconds: clamp_u32("rest_seconds", self.rest_seconds, REST_SECONDS_RANGE),
        })
    }

    /// Replace the blink ceiling, applying the same boundary rules.
    pub fn with_blink_ear_max(self, value: f64) -> Result<Self, ModelError> {
        Self {
            blink_ear_max: value,
            ..self
        }
        .validated()
    }
}

fn clamp_f64(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, ModelError> {
    if !value.is_finite() {
        return Err(ModelError::InvalidValue { field, value });
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        tracing::warn!(field, value, clamped, "Threshold out of range, clamping");
    }
    Ok(clamped)
}

fn clamp_u32(field: &'static str, value: u32, range: RangeInclusive<u32>) -> u32 {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        tracing::warn!(field, value, clamped, "Threshold out of range, clamping");
    }
    clamped
}
