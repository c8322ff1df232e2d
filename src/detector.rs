use log::trace;

use crate::cadence::{CadenceLimits, CadenceValidator, DetectionMode};
use crate::config::Config;
use crate::filters::{GravityFilter, MovingAverage};
use crate::state::AxisState;
use crate::threshold::AdaptiveThreshold;

/// Step detection pipeline for a single accelerometer axis.
///
/// gravity removal -> moving average -> adaptive threshold ->
/// downward crossing -> cadence validation
#[derive(Debug, Clone)]
pub struct AxisStepDetector {
    gravity: GravityFilter,
    smoother: MovingAverage,
    threshold: AdaptiveThreshold,
    cadence: CadenceValidator,
    min_peak: f32,
    state: AxisState,
}

impl AxisStepDetector {
    /// Build a detector from an already validated config.
    pub fn new(config: &Config) -> Self {
        Self {
            gravity: GravityFilter::new(config.gravity_alpha),
            smoother: MovingAverage::new(config.smoothing_window),
            threshold: AdaptiveThreshold::new(config.threshold_window),
            cadence: CadenceValidator::new(CadenceLimits::from(config)),
            min_peak: config.min_peak,
            state: AxisState::default(),
        }
    }

    pub fn update(&mut self, sample: f32, timestamp_ms: u64) {
        self.state.linear_acceleration = self.gravity.apply(sample);

        self.smoother.push(self.state.linear_acceleration);
        self.state.smoothed = self.smoother.value();

        self.threshold.push_sample(self.state.smoothed);
        self.state.threshold = self.threshold.threshold_value();

        self.state.has_valid_steps = false;
        if self.has_valid_peak() && self.state.crossed_below(self.state.threshold) {
            self.state.crossing_count += 1;
            trace!(
                "crossing {} below {} at {} ms",
                self.state.crossing_count, self.state.threshold, timestamp_ms
            );
            self.state.has_valid_steps = self.cadence.on_crossing(timestamp_ms);
            self.threshold.set_current_min_max(self.state.threshold);
        }

        self.state.last_smoothed = self.state.smoothed;
    }

    // Rejects a flat signal before the envelope has seen real motion
    fn has_valid_peak(&self) -> bool {
        self.threshold.fixed_max() > self.min_peak
    }

    pub fn step_count(&self) -> u32 {
        self.cadence.step_count()
    }

    /// Whether the last update added validated steps.
    pub fn has_valid_steps(&self) -> bool {
        self.state.has_valid_steps
    }

    pub fn mode(&self) -> DetectionMode {
        self.cadence.mode()
    }

    pub fn crossing_threshold_count(&self) -> u32 {
        self.state.crossing_count
    }

    pub fn linear_acceleration(&self) -> f32 {
        self.state.linear_acceleration
    }

    pub fn smoothed_acceleration(&self) -> f32 {
        self.state.smoothed
    }

    pub fn gravity(&self) -> f32 {
        self.gravity.gravity()
    }

    pub fn threshold_value(&self) -> f32 {
        self.state.threshold
    }

    pub fn fixed_peak_to_peak(&self) -> f32 {
        self.threshold.fixed_peak_to_peak()
    }

    pub fn current_peak_to_peak(&self) -> f32 {
        self.threshold.current_peak_to_peak()
    }

    pub fn fixed_min(&self) -> f32 {
        self.threshold.fixed_min()
    }

    pub fn fixed_max(&self) -> f32 {
        self.threshold.fixed_max()
    }

    pub fn step_interval(&self) -> u64 {
        self.cadence.step_interval()
    }

    pub fn avg_step_interval(&self) -> u64 {
        self.cadence.avg_step_interval()
    }

    pub fn step_interval_variance(&self) -> f32 {
        self.cadence.step_interval_variance()
    }

    pub fn state(&self) -> &AxisState {
        &self.state
    }
}

impl Default for AxisStepDetector {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
