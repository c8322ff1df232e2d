use crate::filters::MAX_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidGravityAlpha,
    InvalidSmoothingWindow,
    InvalidThresholdWindow,
    InvalidIntervalRange,
    InvalidRatioRange,
    InvalidValidationSteps,
    InvalidInputScale,
    InvalidPeakFloor,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidGravityAlpha => write!(f, "gravity_alpha must be in range [0.0, 1.0)"),
            ConfigError::InvalidSmoothingWindow => {
                write!(f, "smoothing_window must be in range 1..={}", MAX_WINDOW)
            }
            ConfigError::InvalidThresholdWindow => write!(f, "threshold_window must be > 0"),
            ConfigError::InvalidIntervalRange => {
                write!(f, "min_step_interval_ms must be > 0 and not exceed max_step_interval_ms")
            }
            ConfigError::InvalidRatioRange => {
                write!(f, "interval ratio range must satisfy 0.0 < min <= 1.0 <= max")
            }
            ConfigError::InvalidValidationSteps => write!(f, "validation_steps must be >= 3"),
            ConfigError::InvalidInputScale => write!(f, "input_scale must be finite and non-zero"),
            ConfigError::InvalidPeakFloor => write!(f, "min_peak must be finite and >= 0.0"),
        }
    }
}

/// Tunables of the step detection pipeline.
///
/// Defaults are calibrated for a phone or wrist accelerometer reporting m/s^2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Weight of the previous gravity estimate in the gravity low-pass
    pub gravity_alpha: f32,
    /// Moving average window applied to linear acceleration
    pub smoothing_window: usize,
    /// Samples after which the current envelope is promoted to the fixed one
    pub threshold_window: usize,
    /// Detection is suppressed until the settled envelope maximum exceeds this
    pub min_peak: f32,
    /// Fastest accepted cadence (5 steps/s)
    pub min_step_interval_ms: u64,
    /// Slowest accepted cadence (1 step per 2 s)
    pub max_step_interval_ms: u64,
    pub min_interval_ratio: f32,
    pub max_interval_ratio: f32,
    /// Consecutive cadence-stable crossings needed before counting starts
    pub validation_steps: u32,
    /// Multiplier turning raw sample units into m/s^2
    pub input_scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity_alpha: 0.8,
            smoothing_window: 10,
            threshold_window: 50,
            min_peak: 0.3,
            min_step_interval_ms: 200,
            max_step_interval_ms: 2000,
            min_interval_ratio: 0.7,
            max_interval_ratio: 1.3,
            validation_steps: 5,
            input_scale: 1.0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        if !(self.gravity_alpha >= 0.0 && self.gravity_alpha < 1.0) {
            return Err(ConfigError::InvalidGravityAlpha);
        }

        if self.smoothing_window == 0 || self.smoothing_window > MAX_WINDOW {
            return Err(ConfigError::InvalidSmoothingWindow);
        }

        if self.threshold_window == 0 {
            return Err(ConfigError::InvalidThresholdWindow);
        }

        if !(self.min_peak.is_finite() && self.min_peak >= 0.0) {
            return Err(ConfigError::InvalidPeakFloor);
        }

        if self.min_step_interval_ms == 0 || self.min_step_interval_ms > self.max_step_interval_ms {
            return Err(ConfigError::InvalidIntervalRange);
        }

        // A stable cadence has ratio 1.0, so the range has to contain it
        if !(self.min_interval_ratio > 0.0
            && self.min_interval_ratio <= 1.0
            && self.max_interval_ratio >= 1.0
            && self.max_interval_ratio.is_finite())
        {
            return Err(ConfigError::InvalidRatioRange);
        }

        if self.validation_steps < 3 {
            return Err(ConfigError::InvalidValidationSteps);
        }

        if !self.input_scale.is_finite() || self.input_scale == 0.0 {
            return Err(ConfigError::InvalidInputScale);
        }

        Ok(())
    }
}
