//! Raw orientation samples and display rotation.
//!
//! A sample carries at least three axis readings in degrees: azimuth, pitch,
//! and roll. Some devices append an accuracy or status field, giving four or
//! five entries; anything past the third is ignored.

use serde::{Deserialize, Serialize};

/// Number of leading axis readings that carry orientation data.
pub const TILT_AXES: usize = 3;

/// One raw orientation reading as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSensorSample {
    values: Vec<f64>,
}

impl RawSensorSample {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Convenience constructor for a plain azimuth/pitch/roll triple.
    pub fn from_angles(azimuth: f64, pitch: f64, roll: f64) -> Self {
        Self::new(vec![azimuth, pitch, roll])
    }

    /// All values as delivered, including any trailing status fields.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The azimuth/pitch/roll triple, or `None` if fewer than three values exist.
    pub fn tilt_axes(&self) -> Option<[f64; TILT_AXES]> {
        match self.values.as_slice() {
            [azimuth, pitch, roll, ..] => Some([*azimuth, *pitch, *roll]),
            _ => None,
        }
    }

    /// Whether this sample matches a known faulty-reading signature.
    ///
    /// Some hardware emits samples whose first or second axis is exactly
    /// zero; a continuous sensor essentially never reports a true zero there,
    /// so such samples are discarded. Short or non-finite samples are
    /// discarded as well.
    pub fn is_glitch(&self) -> bool {
        match self.tilt_axes() {
            Some(axes) => axes[0] == 0.0 || axes[1] == 0.0 || axes.iter().any(|v| !v.is_finite()),
            None => true,
        }
    }
}

impl From<Vec<f64>> for RawSensorSample {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<[f64; TILT_AXES]> for RawSensorSample {
    fn from(values: [f64; TILT_AXES]) -> Self {
        Self::new(values.to_vec())
    }
}

/// Display rotation relative to the device's natural (portrait) orientation.
///
/// Serialized as its angle in degrees (`0`, `90`, `180`, `270`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u16", into = "u16")]
pub enum ScreenRotation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

/// Angle that is not a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("screen rotation must be a multiple of 90 degrees, got {0}")]
pub struct InvalidRotation(pub i32);

impl ScreenRotation {
    pub const ALL: [ScreenRotation; 4] = [
        ScreenRotation::Rotation0,
        ScreenRotation::Rotation90,
        ScreenRotation::Rotation180,
        ScreenRotation::Rotation270,
    ];

    /// Parse an angle in degrees. Negative and >360 angles wrap.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Rotation0),
            90 => Some(Self::Rotation90),
            180 => Some(Self::Rotation180),
            270 => Some(Self::Rotation270),
            _ => None,
        }
    }

    /// Convert a platform rotation index (quarter turns, 0..=3). Wraps.
    pub fn from_quarter_turns(turns: u8) -> Self {
        Self::ALL[(turns % 4) as usize]
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotation0 => 0,
            Self::Rotation90 => 90,
            Self::Rotation180 => 180,
            Self::Rotation270 => 270,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        (self.degrees() / 90) as u8
    }

    /// Whether the screen's long edge is horizontal.
    pub fn is_landscape(self) -> bool {
        matches!(self, Self::Rotation90 | Self::Rotation270)
    }
}

impl TryFrom<u16> for ScreenRotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees as i32).ok_or(InvalidRotation(degrees as i32))
    }
}

impl From<ScreenRotation> for u16 {
    fn from(rotation: ScreenRotation) -> Self {
        rotation.degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_status_fields_are_ignored() {
        let four = RawSensorSample::new(vec![0.1, 0.2, 0.3, 0.4]);
        let five = RawSensorSample::new(vec![0.1, 0.2, 0.3, 0.4, -1.0]);
        assert_eq!(four.tilt_axes(), Some([0.1, 0.2, 0.3]));
        assert_eq!(five.tilt_axes(), Some([0.1, 0.2, 0.3]));
        assert!(!five.is_glitch());
    }

    #[test]
    fn test_glitch_signatures() {
        assert!(RawSensorSample::from_angles(0.0, 25.0, 40.0).is_glitch());
        assert!(RawSensorSample::from_angles(10.0, 0.0, 40.0).is_glitch());
        assert!(RawSensorSample::from_angles(10.0, f64::NAN, 40.0).is_glitch());
        assert!(RawSensorSample::new(vec![10.0, 25.0]).is_glitch());
        // A level roll axis is a legitimate reading.
        assert!(!RawSensorSample::from_angles(10.0, 25.0, 0.0).is_glitch());
    }

    #[test]
    fn test_rotation_from_degrees_wraps() {
        assert_eq!(ScreenRotation::from_degrees(-90), Some(ScreenRotation::Rotation270));
        assert_eq!(ScreenRotation::from_degrees(450), Some(ScreenRotation::Rotation90));
        assert_eq!(ScreenRotation::from_degrees(45), None);
        assert_eq!(ScreenRotation::from_quarter_turns(6), ScreenRotation::Rotation180);
    }

    #[test]
    fn test_rotation_serializes_as_degrees() {
        let json = serde_json::to_string(&ScreenRotation::Rotation270).unwrap();
        assert_eq!(json, "270");
        let parsed: ScreenRotation = serde_json::from_str("90").unwrap();
        assert_eq!(parsed, ScreenRotation::Rotation90);
        assert!(serde_json::from_str::<ScreenRotation>("30").is_err());
    }

    #[test]
    fn test_landscape() {
        assert!(ScreenRotation::Rotation90.is_landscape());
        assert!(!ScreenRotation::Rotation180.is_landscape());
        assert_eq!(ScreenRotation::Rotation270.quarter_turns(), 3);
    }
}
