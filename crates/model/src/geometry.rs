//! Image/viewport geometry and the transform placing one inside the other.
//!
//! All sizes are in pixels. Transforms map image-space coordinates to
//! viewport-space coordinates.

use serde::{Deserialize, Serialize};

/// Intrinsic drawable size and the viewport it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Geometry {
    pub drawable_width: u32,
    pub drawable_height: u32,
    pub view_width: u32,
    pub view_height: u32,
}

impl Geometry {
    pub fn new(drawable_width: u32, drawable_height: u32, view_width: u32, view_height: u32) -> Self {
        Self {
            drawable_width,
            drawable_height,
            view_width,
            view_height,
        }
    }

    /// Whether every dimension is known. Before the first layout pass the
    /// viewport (or drawable) reports zero, and nothing can be computed yet.
    pub fn is_measured(&self) -> bool {
        self.drawable_width > 0
            && self.drawable_height > 0
            && self.view_width > 0
            && self.view_height > 0
    }

    /// Same geometry with a new viewport size.
    pub fn with_view(self, view_width: u32, view_height: u32) -> Self {
        Self {
            view_width,
            view_height,
            ..self
        }
    }
}

/// Uniform scale followed by a 2D translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Map an image-space point into viewport space.
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    /// Where the scaled drawable lands in the viewport.
    pub fn image_bounds(&self, geometry: &Geometry) -> Bounds {
        let (left, top) = self.map_point(0.0, 0.0);
        let (right, bottom) =
            self.map_point(geometry.drawable_width as f64, geometry.drawable_height as f64);
        Bounds {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the scaled drawable covers `[0, view]` on both axes, allowing
    /// `tolerance` pixels of floating-point slop.
    pub fn covers_view(&self, geometry: &Geometry, tolerance: f64) -> bool {
        let b = self.image_bounds(geometry);
        b.left <= tolerance
            && b.top <= tolerance
            && b.right >= geometry.view_width as f64 - tolerance
            && b.bottom >= geometry.view_height as f64 - tolerance
    }

    /// Row-major 3x3 matrix, for sinks that take a full affine matrix.
    pub fn to_matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.scale, 0.0, self.translate_x],
            [0.0, self.scale, self.translate_y],
            [0.0, 0.0, 1.0],
        ]
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
