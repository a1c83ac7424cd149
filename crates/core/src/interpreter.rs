//! Sensor interpretation.
//!
//! Converts one raw orientation sample into a [`NormalizedVector`]:
//!
//! 1. Drop glitched samples (first or second axis exactly zero).
//! 2. Scale pitch and roll from degrees so a quarter turn is full deflection.
//! 3. Add the forward tilt offset to the forward/back axis for the current
//!    rotation, wrapping around the periodic `[-1, 1]` range.
//! 4. Multiply by the tilt sensitivity and saturate to `[-1, 1]`.
//! 5. Remap and sign-flip the axes for the screen rotation so a given
//!    physical tilt always produces the same visual shift.
//!
//! Each sample is interpreted independently; only configuration persists.

use motion_common::config::{OffsetMode, ParallaxSettings};
use motion_common::error::{
    check_forward_tilt_offset, check_tilt_sensitivity, MotionError, MotionResult,
};
use motion_model::sample::{RawSensorSample, ScreenRotation};
use motion_model::vector::NormalizedVector;

/// Tilt in degrees that produces a full `±1.0` deflection before sensitivity.
pub const FULL_DEFLECTION_DEGREES: f64 = 90.0;

/// A physical tilt axis of the raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiltAxis {
    /// Raw axis 1: rotation about the device's short edge.
    Pitch,
    /// Raw axis 2: rotation about the device's long edge.
    Roll,
}

impl TiltAxis {
    fn index(self) -> usize {
        match self {
            TiltAxis::Pitch => 0,
            TiltAxis::Roll => 1,
        }
    }

    fn other(self) -> TiltAxis {
        match self {
            TiltAxis::Pitch => TiltAxis::Roll,
            TiltAxis::Roll => TiltAxis::Pitch,
        }
    }
}

/// A physical axis with the sign it contributes with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSource {
    pub axis: TiltAxis,
    pub sign: f64,
}

impl AxisSource {
    const fn new(axis: TiltAxis, sign: f64) -> Self {
        Self { axis, sign }
    }

    fn read(&self, tilt: &[f64; 2]) -> f64 {
        self.sign * tilt[self.axis.index()]
    }
}

/// How the two tilt axes feed the look vector under one screen rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    pub horizontal: AxisSource,
    pub vertical: AxisSource,
    /// The axis that represents forward/back lean, and the sign the
    /// forward tilt offset is added with.
    pub forward: AxisSource,
}

/// Axis remap table. Each step of rotation turns the output vector a
/// quarter turn, so one physical tilt reads the same on screen.
pub fn axis_mapping(rotation: ScreenRotation) -> AxisMapping {
    use TiltAxis::{Pitch, Roll};

    match rotation {
        ScreenRotation::Rotation0 => AxisMapping {
            horizontal: AxisSource::new(Pitch, -1.0),
            vertical: AxisSource::new(Roll, -1.0),
            forward: AxisSource::new(Pitch, 1.0),
        },
        ScreenRotation::Rotation90 => AxisMapping {
            horizontal: AxisSource::new(Roll, 1.0),
            vertical: AxisSource::new(Pitch, -1.0),
            forward: AxisSource::new(Roll, -1.0),
        },
        ScreenRotation::Rotation180 => AxisMapping {
            horizontal: AxisSource::new(Pitch, 1.0),
            vertical: AxisSource::new(Roll, 1.0),
            forward: AxisSource::new(Pitch, -1.0),
        },
        ScreenRotation::Rotation270 => AxisMapping {
            horizontal: AxisSource::new(Roll, -1.0),
            vertical: AxisSource::new(Pitch, 1.0),
            forward: AxisSource::new(Roll, 1.0),
        },
    }
}

/// Interpreter tuning. Always valid: every constructor and setter checks
/// its input and leaves the previous value in place on rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpreterConfig {
    tilt_sensitivity: f64,
    forward_tilt_offset: f64,
    offset_mode: OffsetMode,
}

impl InterpreterConfig {
    pub fn new(tilt_sensitivity: f64, forward_tilt_offset: f64) -> MotionResult<Self> {
        Ok(Self {
            tilt_sensitivity: check_tilt_sensitivity(tilt_sensitivity)?,
            forward_tilt_offset: check_forward_tilt_offset(forward_tilt_offset)?,
            offset_mode: OffsetMode::ForwardAxis,
        })
    }

    pub fn from_settings(settings: &ParallaxSettings) -> MotionResult<Self> {
        Ok(Self::new(settings.tilt_sensitivity, settings.forward_tilt_offset)?
            .with_offset_mode(settings.offset_mode))
    }

    pub fn with_offset_mode(mut self, mode: OffsetMode) -> Self {
        self.offset_mode = mode;
        self
    }

    pub fn tilt_sensitivity(&self) -> f64 {
        self.tilt_sensitivity
    }

    pub fn forward_tilt_offset(&self) -> f64 {
        self.forward_tilt_offset
    }

    pub fn offset_mode(&self) -> OffsetMode {
        self.offset_mode
    }

    pub fn set_tilt_sensitivity(&mut self, value: f64) -> MotionResult<()> {
        match check_tilt_sensitivity(value) {
            Ok(value) => {
                self.tilt_sensitivity = value;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected tilt sensitivity: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_forward_tilt_offset(&mut self, value: f64) -> MotionResult<()> {
        match check_forward_tilt_offset(value) {
            Ok(value) => {
                self.forward_tilt_offset = value;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected forward tilt offset: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_offset_mode(&mut self, mode: OffsetMode) {
        self.offset_mode = mode;
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        let settings = ParallaxSettings::default();
        Self {
            tilt_sensitivity: settings.tilt_sensitivity,
            forward_tilt_offset: settings.forward_tilt_offset,
            offset_mode: settings.offset_mode,
        }
    }
}

/// Interpret one sample. Returns `None` for glitched samples.
pub fn interpret(
    sample: &RawSensorSample,
    rotation: ScreenRotation,
    config: &InterpreterConfig,
) -> Option<NormalizedVector> {
    let mut tilt = normalized_tilt(sample)?;
    let mapping = axis_mapping(rotation);

    let offset = mapping.forward.sign * config.forward_tilt_offset;
    let forward = mapping.forward.axis.index();
    tilt[forward] = wrap_unit(tilt[forward] + offset);
    if config.offset_mode == OffsetMode::BothAxes {
        let lateral = mapping.forward.axis.other().index();
        tilt[lateral] = wrap_unit(tilt[lateral] + offset);
    }

    for value in tilt.iter_mut() {
        *value = (*value * config.tilt_sensitivity).clamp(-1.0, 1.0);
    }

    Some(NormalizedVector::new(
        mapping.horizontal.read(&tilt),
        mapping.vertical.read(&tilt),
    ))
}

/// Pitch and roll as fractions of a quarter turn, or `None` for a glitch.
fn normalized_tilt(sample: &RawSensorSample) -> Option<[f64; 2]> {
    if sample.is_glitch() {
        tracing::trace!(values = ?sample.values(), "Dropping glitched sensor sample");
        return None;
    }
    let [_, pitch, roll] = sample.tilt_axes()?;
    Some([pitch / FULL_DEFLECTION_DEGREES, roll / FULL_DEFLECTION_DEGREES])
}

/// Tilt angles are periodic: overflow past one end re-enters at the other.
fn wrap_unit(value: f64) -> f64 {
    if value > 1.0 {
        value - 2.0
    } else if value < -1.0 {
        value + 2.0
    } else {
        value
    }
}

/// Stateful wrapper owning an [`InterpreterConfig`].
#[derive(Debug, Clone, Default)]
pub struct SensorInterpreter {
    config: InterpreterConfig,
}

impl SensorInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Interpret a sample under the current configuration.
    pub fn interpret(
        &self,
        sample: &RawSensorSample,
        rotation: ScreenRotation,
    ) -> Option<NormalizedVector> {
        interpret(sample, rotation, &self.config)
    }

    pub fn set_tilt_sensitivity(&mut self, value: f64) -> MotionResult<()> {
        self.config.set_tilt_sensitivity(value)
    }

    pub fn set_forward_tilt_offset(&mut self, value: f64) -> MotionResult<()> {
        self.config.set_forward_tilt_offset(value)
    }

    pub fn set_offset_mode(&mut self, mode: OffsetMode) {
        self.config.set_offset_mode(mode);
    }

    /// Adopt the device's current lean as its resting position.
    ///
    /// Sets the forward tilt offset so `sample`'s forward/back tilt maps to
    /// the center. Returns the new offset; on error the old one is kept.
    pub fn calibrate(
        &mut self,
        sample: &RawSensorSample,
        rotation: ScreenRotation,
    ) -> MotionResult<f64> {
        let tilt = normalized_tilt(sample)
            .ok_or_else(|| MotionError::config("cannot calibrate from a glitched sample"))?;
        let forward = axis_mapping(rotation).forward;
        let offset = -forward.sign * tilt[forward.axis.index()];
        self.config.set_forward_tilt_offset(offset)?;
        tracing::debug!(offset, ?rotation, "Calibrated forward tilt offset");
        Ok(offset)
    }
}
