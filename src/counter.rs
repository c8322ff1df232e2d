use log::debug;
use num_traits::AsPrimitive;

use crate::axis::Axis;
use crate::config::{Config, ConfigError};
use crate::detector::AxisStepDetector;

/// Receives the number of steps added by a `count_steps` call.
pub trait StepListener {
    fn on_steps_counted(&mut self, delta_step_count: u32);
}

impl<F> StepListener for F
where
    F: FnMut(u32),
{
    fn on_steps_counted(&mut self, delta_step_count: u32) {
        self(delta_step_count)
    }
}

/// Listener that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoListener;

impl StepListener for NoListener {
    fn on_steps_counted(&mut self, _delta_step_count: u32) {}
}

/// Fuses three per-axis detectors into one step total.
///
/// Each update trusts only the axis with the largest settled peak-to-peak
/// envelope, so a step seen on several axes is counted once.
pub struct StepCounter<L = NoListener> {
    detectors: [AxisStepDetector; 3],
    last_step_counts: [u32; 3],
    step_count: u32,
    detected_axis: Option<Axis>,
    last_timestamp: Option<u64>,
    input_scale: f32,
    listener: L,
}

impl StepCounter<NoListener> {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_listener(config, NoListener)
    }
}

impl<L> StepCounter<L>
where
    L: StepListener,
{
    pub fn with_listener(config: Config, listener: L) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(&config, listener))
    }

    fn assemble(config: &Config, listener: L) -> Self {
        Self {
            detectors: [
                AxisStepDetector::new(config),
                AxisStepDetector::new(config),
                AxisStepDetector::new(config),
            ],
            last_step_counts: [0; 3],
            step_count: 0,
            detected_axis: None,
            last_timestamp: None,
            input_scale: config.input_scale,
            listener,
        }
    }

    /// Process one triaxial sample.
    ///
    /// Timestamps must not go backwards.
    pub fn count_steps<T>(&mut self, sample: [T; 3], timestamp_ms: u64)
    where
        T: AsPrimitive<f32>,
    {
        debug_assert!(
            self.last_timestamp.is_none_or(|last| timestamp_ms >= last),
            "sample timestamps went backwards: {} after {:?}",
            timestamp_ms,
            self.last_timestamp
        );
        self.last_timestamp = Some(timestamp_ms);

        for (detector, value) in self.detectors.iter_mut().zip(sample) {
            detector.update(value.as_() * self.input_scale, timestamp_ms);
        }

        let Some(axis) = best_axis(self.peak_to_peak_values()) else {
            return;
        };

        let detector = &self.detectors[axis.index()];
        if !detector.has_valid_steps() {
            self.detected_axis = None;
            return;
        }

        let delta = detector.step_count() - self.last_step_counts[axis.index()];
        self.step_count += delta;

        for (last, detector) in self.last_step_counts.iter_mut().zip(&self.detectors) {
            *last = detector.step_count();
        }

        if self.detected_axis != Some(axis) {
            debug!("steps now counted on {} axis", axis);
        }
        self.detected_axis = Some(axis);

        self.listener.on_steps_counted(delta);
    }

    /// Cumulative validated step total.
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Restore a total persisted by the host. Listener deltas continue from here.
    pub fn set_step_count(&mut self, steps: u32) {
        self.step_count = steps;
    }

    /// Axis that produced the last delta, cleared when the best axis has none.
    pub fn detected_axis(&self) -> Option<Axis> {
        self.detected_axis
    }

    pub fn detected_axis_label(&self) -> &'static str {
        self.detected_axis.map_or("?", Axis::label)
    }

    pub fn axis(&self, axis: Axis) -> &AxisStepDetector {
        &self.detectors[axis.index()]
    }

    pub fn linear_accelerations(&self) -> [f32; 3] {
        self.detectors.each_ref().map(AxisStepDetector::linear_acceleration)
    }

    pub fn smoothed_accelerations(&self) -> [f32; 3] {
        self.detectors.each_ref().map(AxisStepDetector::smoothed_acceleration)
    }

    pub fn threshold_values(&self) -> [f32; 3] {
        self.detectors.each_ref().map(AxisStepDetector::threshold_value)
    }

    pub fn peak_to_peak_values(&self) -> [f32; 3] {
        self.detectors.each_ref().map(AxisStepDetector::fixed_peak_to_peak)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }
}

impl Default for StepCounter<NoListener> {
    fn default() -> Self {
        Self::assemble(&Config::default(), NoListener)
    }
}

/// Axis with a peak-to-peak strictly above zero and above both other axes.
pub fn best_axis(peak_to_peak: [f32; 3]) -> Option<Axis> {
    let mut best: Option<Axis> = None;
    let mut best_value = 0.0;
    let mut tied = false;

    for axis in Axis::ALL {
        let value = peak_to_peak[axis.index()];
        if value > best_value {
            best = Some(axis);
            best_value = value;
            tied = false;
        } else if best.is_some() && value == best_value {
            tied = true;
        }
    }

    if tied { None } else { best }
}
