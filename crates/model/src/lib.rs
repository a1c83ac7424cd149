//! Motion Data Model
//!
//! Defines the data contracts shared by the parallax computations:
//! - **Samples:** Raw orientation readings and the screen rotation they were taken under
//! - **Vectors:** Rotation-corrected look offsets bounded to `[-1.0, 1.0]`
//! - **Geometry:** Drawable/viewport sizes and the scale+translate transform applied to the image
//! - **Traces:** Recorded sample streams in JSONL form for replay
//!
//! Look vectors are normalized so that `(0.0, 0.0)` is the resting center and
//! `±1.0` is the full available slack on that axis.

pub mod geometry;
pub mod sample;
pub mod trace;
pub mod vector;

pub use geometry::*;
pub use sample::*;
pub use trace::*;
pub use vector::*;
