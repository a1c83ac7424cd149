//! Cover-fit parallax transforms.
//!
//! The drawable is scaled uniformly so it covers the whole viewport (cropping
//! the overflowing axis), then enlarged by the parallax intensity. The
//! enlargement leaves slack on both axes; a [`NormalizedVector`] picks how much
//! of that slack to shift by. Since the shift never exceeds the slack, no edge
//! of the image is ever exposed.

use motion_common::config::IntensityStrictness;
use motion_common::error::{MotionError, MotionResult};
use motion_model::geometry::{AffineTransform, Geometry};
use motion_model::vector::NormalizedVector;

/// Oversize factor applied on top of the cover fit. Always `>= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    value: f64,
    pinned: bool,
}

impl Intensity {
    /// Tight cover fit with no extra slack.
    pub const TIGHT: Intensity = Intensity {
        value: 1.0,
        pinned: false,
    };

    /// Validate an intensity.
    ///
    /// Values below 1.0 are rejected under [`IntensityStrictness::Strict`].
    /// Under [`IntensityStrictness::Lenient`] they become a tight fit whose
    /// translation is pinned to the center.
    pub fn new(value: f64, strictness: IntensityStrictness) -> MotionResult<Self> {
        if !value.is_finite() {
            return Err(MotionError::InvalidIntensity { value });
        }
        if value >= 1.0 {
            return Ok(Self {
                value,
                pinned: false,
            });
        }
        match strictness {
            IntensityStrictness::Strict => Err(MotionError::InvalidIntensity { value }),
            IntensityStrictness::Lenient => {
                tracing::debug!(value, "Clamping intensity to a centered tight fit");
                Ok(Self {
                    value: 1.0,
                    pinned: true,
                })
            }
        }
    }

    /// Map a `0..=max_progress` slider to `1.0 + progress / 10`.
    pub fn from_slider(progress: u32, max_progress: u32) -> Self {
        Self {
            value: 1.0 + progress.min(max_progress) as f64 / 10.0,
            pinned: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether translation is forced to the center.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Re-check under another strictness. A pinned intensity only exists
    /// under lenient handling; under strict it becomes a plain tight fit.
    pub fn with_strictness(self, strictness: IntensityStrictness) -> Self {
        match strictness {
            IntensityStrictness::Strict if self.pinned => Self::TIGHT,
            _ => self,
        }
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::TIGHT
    }
}

/// Scale and slack for one geometry/intensity pair.
///
/// `offset_x`/`offset_y` are the translation that centers the scaled image;
/// they are `<= 0` and their magnitude is how far the image may move in
/// either direction on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Scale that exactly covers the viewport.
    pub fit_scale: f64,
    /// `fit_scale * intensity`.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pinned: bool,
}

impl CoverFit {
    /// Returns `None` until every dimension of `geometry` is known.
    pub fn compute(geometry: &Geometry, intensity: Intensity) -> Option<Self> {
        if !geometry.is_measured() {
            return None;
        }

        let fit_scale = cover_scale(geometry);
        let scale = fit_scale * intensity.value();
        let offset_x = (geometry.view_width as f64 - geometry.drawable_width as f64 * scale) * 0.5;
        let offset_y =
            (geometry.view_height as f64 - geometry.drawable_height as f64 * scale) * 0.5;

        Some(Self {
            fit_scale,
            scale,
            offset_x,
            offset_y,
            pinned: intensity.is_pinned(),
        })
    }

    /// Place the image shifted by `vector`'s fraction of the slack.
    pub fn transform(&self, vector: NormalizedVector) -> AffineTransform {
        let vector = if self.pinned {
            NormalizedVector::CENTER
        } else {
            // Re-saturate: the fields are public and may hold anything.
            NormalizedVector::new(vector.x, vector.y)
        };

        AffineTransform {
            scale: self.scale,
            translate_x: self.offset_x + self.offset_x * vector.x,
            translate_y: self.offset_y + self.offset_y * vector.y,
        }
    }

    /// The transform with no shift.
    pub fn centered(&self) -> AffineTransform {
        self.transform(NormalizedVector::CENTER)
    }
}

/// Uniform scale that makes the drawable exactly cover the viewport.
///
/// Whichever axis is relatively shorter is fitted; the other overflows.
/// The caller must ensure `geometry.is_measured()`.
fn cover_scale(geometry: &Geometry) -> f64 {
    let wide = geometry.drawable_width as u64 * geometry.view_height as u64
        > geometry.view_width as u64 * geometry.drawable_height as u64;
    if wide {
        geometry.view_height as f64 / geometry.drawable_height as f64
    } else {
        geometry.view_width as f64 / geometry.drawable_width as f64
    }
}

/// Compute the image transform for one geometry, intensity and look vector.
///
/// Returns `None` (leave the current transform as is) until the geometry is
/// fully measured.
pub fn configure_transform(
    geometry: &Geometry,
    intensity: Intensity,
    vector: NormalizedVector,
) -> Option<AffineTransform> {
    CoverFit::compute(geometry, intensity).map(|fit| fit.transform(vector))
}
