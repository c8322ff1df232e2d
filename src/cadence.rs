//! Step interval validation.
//!
//! Threshold crossings only become steps once they arrive at a plausible and
//! stable cadence. In [`DetectionMode::Searching`] a streak of crossings is
//! collected, each interval compared with the one before it. When the streak
//! is long enough the whole streak is counted at once and the validator moves
//! to [`DetectionMode::Counting`], where every crossing is compared with the
//! average interval of that streak and counted individually.

use log::{debug, trace};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    #[default]
    Searching,
    Counting,
}

/// Acceptance limits for step intervals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CadenceLimits {
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub min_ratio: f32,
    pub max_ratio: f32,
    pub validation_steps: u32,
}

impl CadenceLimits {
    pub fn interval_in_range(&self, interval_ms: u64) -> bool {
        interval_ms >= self.min_interval_ms && interval_ms <= self.max_interval_ms
    }

    pub fn ratio_in_range(&self, ratio: f32) -> bool {
        ratio >= self.min_ratio && ratio <= self.max_ratio
    }
}

impl Default for CadenceLimits {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CadenceLimits {
    fn from(config: &Config) -> Self {
        Self {
            min_interval_ms: config.min_step_interval_ms,
            max_interval_ms: config.max_step_interval_ms,
            min_ratio: config.min_interval_ratio,
            max_ratio: config.max_interval_ratio,
            validation_steps: config.validation_steps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CadenceValidator {
    limits: CadenceLimits,
    mode: DetectionMode,

    // Searching bookkeeping
    streak: u32,
    interval_sum: u64,

    previous_step_time: u64,
    previous_interval: u64,
    step_interval: u64,
    avg_step_interval: u64,
    interval_variance: f32,
    step_count: u32,
}

impl CadenceValidator {
    pub fn new(limits: CadenceLimits) -> Self {
        Self {
            limits,
            mode: DetectionMode::Searching,
            // The first crossing is taken on trust; later ones are validated
            streak: 1,
            interval_sum: 0,
            previous_step_time: 0,
            previous_interval: 0,
            step_interval: 0,
            avg_step_interval: 0,
            interval_variance: 0.0,
            step_count: 0,
        }
    }

    /// Feed the timestamp of a threshold crossing.
    ///
    /// Returns `true` when the crossing added validated steps.
    pub fn on_crossing(&mut self, timestamp_ms: u64) -> bool {
        match self.mode {
            DetectionMode::Searching => self.search(timestamp_ms),
            DetectionMode::Counting => self.count(timestamp_ms),
        }
    }

    fn search(&mut self, timestamp_ms: u64) -> bool {
        self.measure_interval(timestamp_ms);

        if !self.limits.interval_in_range(self.step_interval) {
            self.interval_sum = 0;
            self.streak = 1;
            self.previous_interval = self.step_interval;
            return false;
        }

        self.interval_sum += self.step_interval;

        // No previous interval to compare with yet
        if self.streak < 2 {
            self.previous_interval = self.step_interval;
            self.streak += 1;
            return false;
        }

        self.measure_variance(self.previous_interval);
        if !self.limits.ratio_in_range(self.interval_variance) {
            self.interval_sum = 0;
            self.interval_variance = 0.0;
            self.streak = 1;
            return false;
        }

        self.streak += 1;
        if self.streak < self.limits.validation_steps {
            return false;
        }

        self.step_count += self.streak;
        self.avg_step_interval = self.interval_sum / u64::from(self.streak - 1);
        self.mode = DetectionMode::Counting;
        debug!(
            "cadence locked: {} steps at {} ms average interval",
            self.streak, self.avg_step_interval
        );
        true
    }

    fn count(&mut self, timestamp_ms: u64) -> bool {
        let previous_step_time = self.previous_step_time;
        let previous_interval = self.previous_interval;

        self.measure_interval(timestamp_ms);
        if self.limits.interval_in_range(self.step_interval) {
            self.measure_variance(self.avg_step_interval);
            if self.limits.ratio_in_range(self.interval_variance) {
                self.step_count += 1;
                return true;
            }
        }

        debug!(
            "cadence lost: interval {} ms against {} ms average",
            self.step_interval, self.avg_step_interval
        );

        // Re-run the same crossing as the first candidate of a new search
        self.restart_search(previous_step_time, previous_interval);
        self.search(timestamp_ms)
    }

    fn restart_search(&mut self, previous_step_time: u64, previous_interval: u64) {
        self.mode = DetectionMode::Searching;
        self.previous_step_time = previous_step_time;
        self.previous_interval = previous_interval;
        self.streak = 1;
        self.interval_sum = 0;
        self.avg_step_interval = 0;
        self.interval_variance = 0.0;
    }

    fn measure_interval(&mut self, timestamp_ms: u64) {
        debug_assert!(
            timestamp_ms >= self.previous_step_time,
            "crossing timestamps went backwards: {} < {}",
            timestamp_ms,
            self.previous_step_time
        );

        self.step_interval = timestamp_ms.saturating_sub(self.previous_step_time);
        self.previous_step_time = timestamp_ms;
        trace!("crossing at {} ms, interval {} ms", timestamp_ms, self.step_interval);
    }

    fn measure_variance(&mut self, reference_ms: u64) {
        self.interval_variance = if self.step_interval != 0 {
            reference_ms as f32 / self.step_interval as f32
        } else {
            0.0
        };
        self.previous_interval = self.step_interval;
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Length of the current Searching streak, the first crossing included.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn step_interval(&self) -> u64 {
        self.step_interval
    }

    pub fn avg_step_interval(&self) -> u64 {
        self.avg_step_interval
    }

    pub fn step_interval_variance(&self) -> f32 {
        self.interval_variance
    }

    pub fn limits(&self) -> &CadenceLimits {
        &self.limits
    }
}

impl Default for CadenceValidator {
    fn default() -> Self {
        Self::new(CadenceLimits::default())
    }
}
