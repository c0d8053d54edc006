//! Error types shared across FaceGym crates.

use std::path::PathBuf;

use facegym_face_model::ModelError;

/// Top-level error type for FaceGym operations.
#[derive(Debug, thiserror::Error)]
pub enum FaceGymError {
    #[error("Acquisition error: {message}")]
    Acquisition { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Calibration error: {message}")]
    Calibration { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfiguration { field: &'static str, value: f64 },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FaceGymError.
pub type FaceGymResult<T> = Result<T, FaceGymError>;

impl FaceGymError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn calibration(msg: impl Into<String>) -> Self {
        Self::Calibration {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

impl From<ModelError> for FaceGymError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidValue { field, value } => {
                Self::InvalidConfiguration { field, value }
            }
            ModelError::IoError { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                Self::FileNotFound { path }
            }
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_maps_to_invalid_configuration() {
        let err: FaceGymError = ModelError::InvalidValue {
            field: "blink_ear_max",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(
            err,
            FaceGymError::InvalidConfiguration {
                field: "blink_ear_max",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_maps_to_file_not_found() {
        let err: FaceGymError = ModelError::IoError {
            path: PathBuf::from("/nope/frames.jsonl"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert!(matches!(err, FaceGymError::FileNotFound { .. }));
    }
}
