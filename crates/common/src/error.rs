//! Error types shared across Motion crates.
//!
//! Only configuration and lifecycle problems are errors. Glitched sensor
//! samples and unmeasured geometry are expected during normal operation and
//! surface as `None` from the computations instead.

/// Top-level error type for Motion operations.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Tilt sensitivity must be greater than 0, got {value}")]
    InvalidTiltSensitivity { value: f64 },

    #[error("Forward tilt offset must be within [-1.0, 1.0], got {value}")]
    InvalidForwardTiltOffset { value: f64 },

    #[error("Parallax intensity must be 1.0 or greater, got {value}")]
    InvalidIntensity { value: f64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Sensor subscription error: {message}")]
    Subscription { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MotionError.
pub type MotionResult<T> = Result<T, MotionError>;

impl MotionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn subscription(msg: impl Into<String>) -> Self {
        Self::Subscription {
            message: msg.into(),
        }
    }

    /// Whether this error came from rejecting a configuration value.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidTiltSensitivity { .. }
                | Self::InvalidForwardTiltOffset { .. }
                | Self::InvalidIntensity { .. }
                | Self::Config { .. }
        )
    }
}

/// Validate a tilt sensitivity value (finite and strictly positive).
pub fn check_tilt_sensitivity(value: f64) -> MotionResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MotionError::InvalidTiltSensitivity { value })
    }
}

/// Validate a forward tilt offset (finite and within `[-1.0, 1.0]`).
pub fn check_forward_tilt_offset(value: f64) -> MotionResult<f64> {
    if value.is_finite() && value.abs() <= 1.0 {
        Ok(value)
    } else {
        Err(MotionError::InvalidForwardTiltOffset { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_rejects_non_positive() {
        assert!(check_tilt_sensitivity(0.0).is_err());
        assert!(check_tilt_sensitivity(-1.0).is_err());
        assert!(check_tilt_sensitivity(f64::NAN).is_err());
        assert_eq!(check_tilt_sensitivity(2.3).unwrap(), 2.3);
    }

    #[test]
    fn test_offset_bounds_are_inclusive() {
        assert!(check_forward_tilt_offset(1.0).is_ok());
        assert!(check_forward_tilt_offset(-1.0).is_ok());
        assert!(check_forward_tilt_offset(1.01).is_err());
        assert!(check_forward_tilt_offset(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_classification() {
        assert!(MotionError::InvalidIntensity { value: 0.5 }.is_invalid_config());
        assert!(MotionError::config("bad").is_invalid_config());
        assert!(!MotionError::subscription("busy").is_invalid_config());
    }
}
