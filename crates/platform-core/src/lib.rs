//! Motion platform core contracts.
//!
//! The parallax computations never talk to hardware or a UI toolkit directly.
//! This crate holds the narrow contracts the hosting platform implements:
//! a sensor source with a register/unregister lifecycle, a rotation query,
//! and a sink that applies the computed transform to the rendered image.

use std::collections::VecDeque;

use motion_common::error::{MotionError, MotionResult};
use motion_model::geometry::AffineTransform;
use motion_model::sample::{RawSensorSample, ScreenRotation};
use motion_model::trace::TraceRecord;

/// A platform orientation sensor.
///
/// Samples are only delivered between `register` and `unregister`.
pub trait SensorSource {
    /// Start receiving samples (e.g. subscribe at the fastest delivery rate).
    fn register(&mut self) -> MotionResult<()>;

    /// Stop receiving samples. Must be safe to call when not registered.
    fn unregister(&mut self);

    /// Poll for the next pending sample. Returns `None` if none is available.
    fn poll(&mut self) -> Option<RawSensorSample>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

impl<S: SensorSource + ?Sized> SensorSource for &mut S {
    fn register(&mut self) -> MotionResult<()> {
        (**self).register()
    }

    fn unregister(&mut self) {
        (**self).unregister()
    }

    fn poll(&mut self) -> Option<RawSensorSample> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: SensorSource + ?Sized> SensorSource for Box<S> {
    fn register(&mut self) -> MotionResult<()> {
        (**self).register()
    }

    fn unregister(&mut self) {
        (**self).unregister()
    }

    fn poll(&mut self) -> Option<RawSensorSample> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reports the current display rotation. Read once per sample.
pub trait RotationQuery {
    fn current_rotation(&self) -> ScreenRotation;
}

/// A rotation that never changes (headless use, orientation-locked screens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedRotation(pub ScreenRotation);

impl RotationQuery for FixedRotation {
    fn current_rotation(&self) -> ScreenRotation {
        self.0
    }
}

impl<F: Fn() -> ScreenRotation> RotationQuery for F {
    fn current_rotation(&self) -> ScreenRotation {
        self()
    }
}

/// Receives every recomputed transform for the rendered image.
pub trait TransformSink {
    fn apply(&mut self, transform: &AffineTransform);
}

/// Records every applied transform.
impl TransformSink for Vec<AffineTransform> {
    fn apply(&mut self, transform: &AffineTransform) {
        self.push(*transform);
    }
}

/// Discards transforms.
impl TransformSink for () {
    fn apply(&mut self, _transform: &AffineTransform) {}
}

impl<T: TransformSink + ?Sized> TransformSink for &mut T {
    fn apply(&mut self, transform: &AffineTransform) {
        (**self).apply(transform)
    }
}

/// A live sensor registration.
///
/// Acquiring registers the source; releasing or dropping unregisters it, so
/// a hardware subscription never outlives its owner.
pub struct SensorSubscription<S: SensorSource> {
    source: Option<S>,
}

impl<S: SensorSource> SensorSubscription<S> {
    /// Register `source` and wrap it in a guard.
    pub fn acquire(mut source: S) -> MotionResult<Self> {
        source.register()?;
        tracing::info!(source = %source.name(), "Sensor listener registered");
        Ok(Self {
            source: Some(source),
        })
    }

    /// Unregister and hand the source back.
    pub fn release(mut self) -> MotionResult<S> {
        let mut source = self
            .source
            .take()
            .ok_or_else(|| MotionError::subscription("subscription already released"))?;
        source.unregister();
        tracing::info!(source = %source.name(), "Sensor listener unregistered");
        Ok(source)
    }

    /// Poll the underlying source.
    pub fn poll(&mut self) -> Option<RawSensorSample> {
        self.source.as_mut().and_then(|s| s.poll())
    }

    pub fn source_name(&self) -> &str {
        self.source.as_ref().map(|s| s.name()).unwrap_or("released")
    }
}

impl<S: SensorSource> Drop for SensorSubscription<S> {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.unregister();
            tracing::info!(source = %source.name(), "Sensor listener unregistered on drop");
        }
    }
}

/// A sensor source that replays queued samples, e.g. from a recorded trace.
///
/// Samples are only handed out while registered, like a real listener.
#[derive(Debug, Default)]
pub struct ReplaySource {
    name: String,
    pending: VecDeque<RawSensorSample>,
    registered: bool,
    registrations: u32,
}

impl ReplaySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build from trace records, dropping their rotation and timing.
    pub fn from_trace(name: impl Into<String>, records: &[TraceRecord]) -> Self {
        let mut source = Self::new(name);
        source.extend(records.iter().map(|r| r.values.clone()));
        source
    }

    pub fn push(&mut self, sample: RawSensorSample) {
        self.pending.push_back(sample);
    }

    pub fn extend(&mut self, samples: impl IntoIterator<Item = RawSensorSample>) {
        self.pending.extend(samples);
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// How many times `register` has succeeded.
    pub fn registrations(&self) -> u32 {
        self.registrations
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl SensorSource for ReplaySource {
    fn register(&mut self) -> MotionResult<()> {
        if self.registered {
            return Err(MotionError::subscription(format!(
                "{} is already registered",
                self.name
            )));
        }
        self.registered = true;
        self.registrations += 1;
        Ok(())
    }

    fn unregister(&mut self) {
        self.registered = false;
    }

    fn poll(&mut self) -> Option<RawSensorSample> {
        if !self.registered {
            return None;
        }
        self.pending.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawSensorSample {
        RawSensorSample::from_angles(10.0, 25.0, 40.0)
    }

    #[test]
    fn test_subscription_registers_and_releases() {
        let mut source = ReplaySource::new("replay");
        source.push(sample());

        let mut sub = SensorSubscription::acquire(&mut source).unwrap();
        assert_eq!(sub.source_name(), "replay");
        assert_eq!(sub.poll(), Some(sample()));
        assert_eq!(sub.poll(), None);
        sub.release().unwrap();

        assert!(!source.is_registered());
        assert_eq!(source.registrations(), 1);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let mut source = ReplaySource::new("replay");
        {
            let _sub = SensorSubscription::acquire(&mut source).unwrap();
        }
        assert!(!source.is_registered());
    }

    #[test]
    fn test_unregistered_source_delivers_nothing() {
        let mut source = ReplaySource::new("replay");
        source.push(sample());
        assert_eq!(source.poll(), None);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_double_registration_is_rejected() {
        let mut source = ReplaySource::new("replay");
        source.register().unwrap();
        assert!(matches!(
            SensorSubscription::acquire(&mut source),
            Err(MotionError::Subscription { .. })
        ));
    }

    #[test]
    fn test_recording_sink_collects_transforms() {
        let mut sink: Vec<AffineTransform> = Vec::new();
        sink.apply(&AffineTransform::IDENTITY);
        assert_eq!(sink, vec![AffineTransform::IDENTITY]);
    }

    #[test]
    fn test_closure_rotation_query() {
        let query = || ScreenRotation::Rotation90;
        assert_eq!(query.current_rotation(), ScreenRotation::Rotation90);
        assert_eq!(
            FixedRotation(ScreenRotation::Rotation180).current_rotation(),
            ScreenRotation::Rotation180
        );
    }
}
