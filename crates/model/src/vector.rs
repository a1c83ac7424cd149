//! Rotation-corrected look offsets.

use serde::{Deserialize, Serialize};

/// A look offset in the screen's frame, each axis bounded to `[-1.0, 1.0]`.
///
/// `x` is the horizontal offset and `y` the vertical offset, expressed as
/// the fraction of available slack the image should shift by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVector {
    pub x: f64,
    pub y: f64,
}

impl NormalizedVector {
    /// No offset: the image sits at its centered position.
    pub const CENTER: NormalizedVector = NormalizedVector { x: 0.0, y: 0.0 };

    /// Create a vector, saturating each axis to `[-1.0, 1.0]`.
    ///
    /// NaN components collapse to 0.0.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: saturate(x),
            y: saturate(y),
        }
    }

    /// Whether both components lie within `[-1.0, 1.0]`.
    pub fn is_bounded(&self) -> bool {
        self.x.abs() <= 1.0 && self.y.abs() <= 1.0
    }
}

impl Default for NormalizedVector {
    fn default() -> Self {
        Self::CENTER
    }
}

fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_saturates() {
        let v = NormalizedVector::new(1.7, -3.0);
        assert_eq!(v, NormalizedVector { x: 1.0, y: -1.0 });
        assert!(v.is_bounded());
    }

    #[test]
    fn test_nan_collapses_to_center() {
        let v = NormalizedVector::new(f64::NAN, 0.25);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 0.25);
    }

    #[test]
    fn test_unchecked_literal_can_be_out_of_bounds() {
        let v = NormalizedVector { x: 1.5, y: 0.0 };
        assert!(!v.is_bounded());
    }

    proptest! {
        #[test]
        fn test_new_is_always_bounded(x in any::<f64>(), y in any::<f64>()) {
            prop_assert!(NormalizedVector::new(x, y).is_bounded());
        }
    }
}
