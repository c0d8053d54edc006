//! Application configuration.

use std::path::PathBuf;

use facegym_face_model::ThresholdConfig;
use serde::{Deserialize, Serialize};

use crate::error::{FaceGymError, FaceGymResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture thresholds applied to new sessions.
    pub thresholds: ThresholdConfig,

    /// Blink calibration procedure.
    pub calibration: CalibrationSettings,

    /// Display toggles.
    pub display: DisplayOptions,

    /// Frame loop pacing.
    pub pacing: PacingConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters of the open-eye blink calibration.
///
/// These are heuristics, not clinically validated values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Number of sample ticks in one calibration window.
    pub sample_budget: u32,

    /// Delay between sample ticks.
    pub sample_interval_ms: u64,

    /// Hard bound on the whole window.
    pub timeout_ms: u64,

    /// Multiplier applied to the mean open-eye EAR.
    pub factor: f64,

    /// Samples with `EAR <= min_valid_ear` are treated as noise.
    pub min_valid_ear: f64,
}

/// Display toggles forwarded with every feedback tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Speak instruction changes.
    pub voice: bool,

    /// Hide metrics and confirmation progress.
    pub simplified: bool,
}

/// Frame loop pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Interval between detection ticks.
    pub frame_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facegym=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            sample_budget: 40,
            sample_interval_ms: 20,
            timeout_ms: 3000,
            factor: 0.72,
            min_valid_ear: 0.1,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            voice: true,
            simplified: true,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl CalibrationSettings {
    /// Reject settings that could never produce a usable threshold.
    pub fn validated(self) -> FaceGymResult<Self> {
        if !self.factor.is_finite() || self.factor <= 0.0 || self.factor > 1.0 {
            return Err(FaceGymError::InvalidConfiguration {
                field: "calibration.factor",
                value: self.factor,
            });
        }
        if !self.min_valid_ear.is_finite() || self.min_valid_ear < 0.0 {
            return Err(FaceGymError::InvalidConfiguration {
                field: "calibration.min_valid_ear",
                value: self.min_valid_ear,
            });
        }
        Ok(Self {
            sample_budget: self.sample_budget.max(1),
            timeout_ms: self.timeout_ms.max(1),
            ..self
        })
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Pass every consumer-adjustable value through boundary validation.
    pub fn sanitized(self) -> FaceGymResult<Self> {
        Ok(Self {
            thresholds: self.thresholds.validated()?,
            calibration: self.calibration.validated()?,
            pacing: PacingConfig {
                frame_interval_ms: self.pacing.frame_interval_ms.max(1),
            },
            ..self
        })
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facegym").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_sanitizes_unchanged() {
        let config = AppConfig::default().sanitized().unwrap();
        assert_eq!(config.thresholds, ThresholdConfig::default());
        assert_eq!(config.calibration, CalibrationSettings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"thresholds":{"rest_seconds":0},"display":{"voice":false}}"#)
                .unwrap();
        assert_eq!(config.thresholds.rest_seconds, 0);
        assert_eq!(config.thresholds.frames_required, 3);
        assert!(!config.display.voice);
        assert!(config.display.simplified);
        assert_eq!(config.calibration.sample_budget, 40);
    }

    #[test]
    fn test_bad_calibration_factor_rejected() {
        let config = AppConfig {
            calibration: CalibrationSettings {
                factor: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.sanitized(),
            Err(FaceGymError::InvalidConfiguration {
                field: "calibration.factor",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_budget_is_raised() {
        let settings = CalibrationSettings {
            sample_budget: 0,
            timeout_ms: 0,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(settings.sample_budget, 1);
        assert_eq!(settings.timeout_ms, 1);
    }
}
