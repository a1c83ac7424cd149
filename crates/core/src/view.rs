//! Owned parallax state for one rendered image.
//!
//! A [`ParallaxView`] holds the geometry, intensity, interpreter and latest
//! look vector for a single image, recomputes the transform whenever one of
//! them changes, and pushes the result to a [`TransformSink`]. It can also
//! own the sensor registration, so the hardware listener is released when
//! the view stops listening or is dropped.

use motion_common::config::{IntensityStrictness, OffsetMode, ParallaxSettings};
use motion_common::error::MotionResult;
use motion_model::geometry::{AffineTransform, Geometry};
use motion_model::sample::{RawSensorSample, ScreenRotation};
use motion_model::vector::NormalizedVector;
use motion_platform_core::{RotationQuery, SensorSource, SensorSubscription, TransformSink};

use crate::interpreter::{InterpreterConfig, SensorInterpreter};
use crate::transform::{CoverFit, Intensity};

pub struct ParallaxView<K: TransformSink> {
    geometry: Geometry,
    intensity: Intensity,
    strictness: IntensityStrictness,
    interpreter: SensorInterpreter,
    translation: NormalizedVector,
    fit: Option<CoverFit>,
    transform: Option<AffineTransform>,
    sink: K,
    subscription: Option<SensorSubscription<Box<dyn SensorSource>>>,
}

impl<K: TransformSink> ParallaxView<K> {
    /// A view with default tuning and no geometry yet.
    pub fn new(sink: K) -> Self {
        Self::with_interpreter(SensorInterpreter::default(), Intensity::TIGHT, sink)
    }

    /// Build a view from validated settings.
    pub fn from_settings(settings: &ParallaxSettings, sink: K) -> MotionResult<Self> {
        let interpreter = SensorInterpreter::new(InterpreterConfig::from_settings(settings)?);
        let intensity = Intensity::new(settings.intensity, settings.strictness)?;
        let mut view = Self::with_interpreter(interpreter, intensity, sink);
        view.strictness = settings.strictness;
        Ok(view)
    }

    fn with_interpreter(interpreter: SensorInterpreter, intensity: Intensity, sink: K) -> Self {
        Self {
            geometry: Geometry::default(),
            intensity,
            strictness: IntensityStrictness::default(),
            interpreter,
            translation: NormalizedVector::CENTER,
            fit: None,
            transform: None,
            sink,
            subscription: None,
        }
    }

    /// Update drawable and viewport sizes (call on every layout pass).
    ///
    /// While any dimension is zero the previous transform stays in effect.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.refit();
    }

    /// Change the oversize factor. On error nothing changes.
    pub fn set_intensity(&mut self, value: f64) -> MotionResult<()> {
        let intensity = Intensity::new(value, self.strictness).map_err(|e| {
            tracing::warn!("Rejected parallax intensity: {}", e);
            e
        })?;
        self.intensity = intensity;
        self.refit();
        Ok(())
    }

    /// Change how intensities below 1.0 are handled. Switching to strict
    /// drops a pinned intensity to a plain tight fit and recomputes.
    pub fn set_strictness(&mut self, strictness: IntensityStrictness) {
        self.strictness = strictness;
        let intensity = self.intensity.with_strictness(strictness);
        if intensity != self.intensity {
            self.intensity = intensity;
            self.refit();
        }
    }

    pub fn set_tilt_sensitivity(&mut self, value: f64) -> MotionResult<()> {
        self.interpreter.set_tilt_sensitivity(value)
    }

    pub fn set_forward_tilt_offset(&mut self, value: f64) -> MotionResult<()> {
        self.interpreter.set_forward_tilt_offset(value)
    }

    pub fn set_offset_mode(&mut self, mode: OffsetMode) {
        self.interpreter.set_offset_mode(mode);
    }

    /// Shift the image directly, bypassing the sensor. Saturates to `[-1, 1]`.
    pub fn set_translation(&mut self, vector: NormalizedVector) {
        self.translation = NormalizedVector::new(vector.x, vector.y);
        self.push();
    }

    /// Feed one sensor sample. Returns the new transform, or `None` if the
    /// sample was a glitch or geometry is not measured yet.
    pub fn on_sample(
        &mut self,
        sample: &RawSensorSample,
        rotation: ScreenRotation,
    ) -> Option<AffineTransform> {
        let vector = self.interpreter.interpret(sample, rotation)?;
        self.translation = vector;
        self.push()
    }

    /// Treat the device's current lean as its resting position.
    pub fn calibrate(
        &mut self,
        sample: &RawSensorSample,
        rotation: ScreenRotation,
    ) -> MotionResult<f64> {
        self.interpreter.calibrate(sample, rotation)
    }

    /// Register `source` and start listening. Any previous source is released.
    pub fn attach_sensor(&mut self, source: Box<dyn SensorSource>) -> MotionResult<()> {
        self.detach_sensor();
        self.subscription = Some(SensorSubscription::acquire(source)?);
        Ok(())
    }

    /// Stop listening and hand back the source, if one was attached.
    pub fn detach_sensor(&mut self) -> Option<Box<dyn SensorSource>> {
        let subscription = self.subscription.take()?;
        match subscription.release() {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("Failed to release sensor subscription: {}", e);
                None
            }
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drain pending samples from the attached source, reading the rotation
    /// once per sample. Returns how many samples produced a transform.
    pub fn pump<R: RotationQuery + ?Sized>(&mut self, rotation: &R) -> usize {
        let mut applied = 0;
        while let Some(sample) = self.subscription.as_mut().and_then(|s| s.poll()) {
            if self.on_sample(&sample, rotation.current_rotation()).is_some() {
                applied += 1;
            }
        }
        applied
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn interpreter(&self) -> &SensorInterpreter {
        &self.interpreter
    }

    pub fn translation(&self) -> NormalizedVector {
        self.translation
    }

    /// The last transform pushed to the sink.
    pub fn transform(&self) -> Option<AffineTransform> {
        self.transform
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    fn refit(&mut self) {
        self.fit = CoverFit::compute(&self.geometry, self.intensity);
        if self.fit.is_none() {
            tracing::debug!(geometry = ?self.geometry, "Geometry not measured, keeping transform");
        }
        self.push();
    }

    fn push(&mut self) -> Option<AffineTransform> {
        let transform = self.fit?.transform(self.translation);
        self.transform = Some(transform);
        self.sink.apply(&transform);
        Some(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_common::error::MotionError;
    use motion_platform_core::{FixedRotation, ReplaySource};

    fn measured_view() -> ParallaxView<Vec<AffineTransform>> {
        let mut view = ParallaxView::new(Vec::new());
        view.set_intensity(2.0).unwrap();
        view.set_geometry(Geometry::new(200, 100, 100, 100));
        view
    }

    #[test]
    fn test_nothing_is_pushed_before_layout() {
        let mut view = ParallaxView::new(Vec::new());
        view.set_intensity(1.5).unwrap();
        let update = view.on_sample(
            &RawSensorSample::from_angles(10.0, 25.0, 40.0),
            ScreenRotation::Rotation0,
        );
        assert!(update.is_none());
        assert!(view.sink().is_empty());
        assert!(view.transform().is_none());
    }

    #[test]
    fn test_geometry_change_recomputes() {
        let view = measured_view();
        let t = view.transform().unwrap();
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.translate_x, -150.0);
        assert_eq!(view.sink().len(), 1);
    }

    #[test]
    fn test_zero_geometry_keeps_previous_transform() {
        let mut view = measured_view();
        let before = view.transform();
        view.set_geometry(Geometry::new(200, 100, 0, 0));
        assert_eq!(view.transform(), before);
        assert_eq!(view.sink().len(), 1);
    }

    #[test]
    fn test_intensity_change_rescales_current_shift() {
        let mut view = measured_view();
        view.set_translation(NormalizedVector::new(1.0, 0.0));
        assert_eq!(view.transform().unwrap().translate_x, -300.0);

        view.set_intensity(3.0).unwrap();
        let t = view.transform().unwrap();
        // Offset is (100 - 600) / 2 = -250; full shift doubles it.
        assert_eq!(t.translate_x, -500.0);
        assert!(t.covers_view(&view.geometry(), 1e-9));
    }

    #[test]
    fn test_rejected_intensity_keeps_state() {
        let mut view = measured_view();
        assert!(matches!(
            view.set_intensity(0.5),
            Err(MotionError::InvalidIntensity { .. })
        ));
        assert_eq!(view.intensity().value(), 2.0);
        assert_eq!(view.sink().len(), 1);
    }

    #[test]
    fn test_strict_switch_releases_pinned_intensity() {
        let mut view = ParallaxView::new(Vec::new());
        view.set_geometry(Geometry::new(200, 100, 100, 100));
        view.set_strictness(IntensityStrictness::Lenient);
        view.set_intensity(0.5).unwrap();
        assert!(view.intensity().is_pinned());

        view.set_strictness(IntensityStrictness::Strict);
        assert!(!view.intensity().is_pinned());
        assert_eq!(view.intensity().value(), 1.0);

        // Tight fit leaves 50px of horizontal slack; a full shift uses all of it.
        view.set_translation(NormalizedVector::new(1.0, 1.0));
        let t = view.transform().unwrap();
        assert_eq!(t.translate_x, -100.0);
        assert_eq!(t.translate_y, 0.0);
        assert!(t.covers_view(&view.geometry(), 1e-9));
    }

    #[test]
    fn test_glitched_sample_leaves_transform() {
        let mut view = measured_view();
        let before = view.transform();
        let update = view.on_sample(
            &RawSensorSample::from_angles(0.0, 25.0, 40.0),
            ScreenRotation::Rotation0,
        );
        assert!(update.is_none());
        assert_eq!(view.transform(), before);
    }

    #[test]
    fn test_sample_moves_image() {
        let mut view = measured_view();
        view.set_forward_tilt_offset(0.0).unwrap();
        let t = view
            .on_sample(
                &RawSensorSample::from_angles(10.0, 25.0, 40.0),
                ScreenRotation::Rotation0,
            )
            .unwrap();
        let v = view.translation();
        assert!((v.x + 0.5556).abs() < 1e-4);
        assert!((t.translate_x - (-150.0 - 150.0 * v.x)).abs() < 1e-9);
    }

    #[test]
    fn test_settings_build_a_view() {
        let settings = ParallaxSettings {
            tilt_sensitivity: 2.3,
            forward_tilt_offset: 0.35,
            intensity: 1.1,
            offset_mode: OffsetMode::BothAxes,
            strictness: IntensityStrictness::Lenient,
        };
        let mut view = ParallaxView::from_settings(&settings, ()).unwrap();
        assert_eq!(view.interpreter().config().tilt_sensitivity(), 2.3);
        assert_eq!(view.interpreter().config().offset_mode(), OffsetMode::BothAxes);

        // Lenient: accepted, but pinned.
        view.set_intensity(0.8).unwrap();
        assert!(view.intensity().is_pinned());
    }

    #[test]
    fn test_sensor_lifecycle_and_pump() {
        let mut source = ReplaySource::new("replay");
        source.extend([
            RawSensorSample::from_angles(10.0, 25.0, 40.0),
            RawSensorSample::from_angles(0.0, 25.0, 40.0),
            RawSensorSample::from_angles(10.0, -20.0, 15.0),
        ]);

        let mut view = measured_view();
        assert!(!view.is_listening());
        view.attach_sensor(Box::new(source)).unwrap();
        assert!(view.is_listening());

        let applied = view.pump(&FixedRotation(ScreenRotation::Rotation90));
        assert_eq!(applied, 2);
        assert_eq!(view.sink().len(), 3);

        let source = view.detach_sensor().unwrap();
        assert_eq!(source.name(), "replay");
        assert!(!view.is_listening());
        assert!(view.detach_sensor().is_none());
    }
}
