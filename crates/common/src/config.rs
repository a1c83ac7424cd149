//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{check_forward_tilt_offset, check_tilt_sensitivity, MotionError, MotionResult};

/// Global configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Parallax tuning.
    pub parallax: ParallaxSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parallax tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Multiplier from normalized tilt to look-offset. Must be > 0.
    pub tilt_sensitivity: f64,

    /// Compensation for the device's natural forward lean, in `[-1.0, 1.0]`.
    pub forward_tilt_offset: f64,

    /// Oversize factor applied on top of the cover fit (1.0 = no slack).
    pub intensity: f64,

    /// Which tilt axes the forward offset is applied to.
    pub offset_mode: OffsetMode,

    /// How out-of-range intensity values are treated.
    pub strictness: IntensityStrictness,
}

/// Which tilt axes receive the forward tilt offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// Only the axis representing forward/back tilt for the current rotation.
    #[default]
    ForwardAxis,
    /// Both tilt axes, with the forward axis sign for the current rotation.
    BothAxes,
}

/// Handling of intensity values below 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntensityStrictness {
    /// Reject with [`MotionError::InvalidIntensity`].
    #[default]
    Strict,
    /// Clamp to 1.0: tight fit, image pinned to the center.
    Lenient,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "motion_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            tilt_sensitivity: 2.0,
            forward_tilt_offset: 0.3,
            intensity: 1.0,
            offset_mode: OffsetMode::ForwardAxis,
            strictness: IntensityStrictness::Strict,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ParallaxSettings {
    /// Check every value at once; nothing is applied on failure.
    pub fn validate(&self) -> MotionResult<()> {
        check_tilt_sensitivity(self.tilt_sensitivity)?;
        check_forward_tilt_offset(self.forward_tilt_offset)?;
        if !self.intensity.is_finite()
            || (self.strictness == IntensityStrictness::Strict && self.intensity < 1.0)
        {
            return Err(MotionError::InvalidIntensity {
                value: self.intensity,
            });
        }
        Ok(())
    }
}

impl MotionConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> MotionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> MotionResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.parallax.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> MotionResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> MotionResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
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
    base.join("motion").join("config.json")
}
