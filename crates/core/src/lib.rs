//! Motion Core: the parallax engine
//!
//! Turns device tilt into a stable image shift:
//! - **Interpreter:** Normalize raw orientation samples into a rotation-corrected look vector
//! - **Transform:** Cover-fit an image into its viewport, oversize it, and shift it within the slack
//! - **View:** Owned state tying the two together behind explicit setters
//!
//! The interpreter and transform are pure computation: no I/O, no platform
//! dependencies. All inputs are data; all outputs are data.

pub mod interpreter;
pub mod transform;
pub mod view;

pub use interpreter::{interpret, InterpreterConfig, SensorInterpreter};
pub use transform::{configure_transform, CoverFit, Intensity};
pub use view::ParallaxView;
