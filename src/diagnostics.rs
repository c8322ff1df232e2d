//! Per-axis snapshots and a CSV trace for tuning the detector offline.
//!
//! Rows go to any [`core::fmt::Write`] sink, so the trace can be streamed over
//! a serial port as easily as collected into a `String` on a host.

use core::fmt::{self, Write};

use crate::axis::Axis;
use crate::cadence::DetectionMode;
use crate::counter::{StepCounter, StepListener};
use crate::detector::AxisStepDetector;

/// Copy of one axis's diagnostic values after an update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReport {
    pub axis: Axis,
    pub linear_acceleration: f32,
    pub smoothed_acceleration: f32,
    pub threshold: f32,
    pub current_peak_to_peak: f32,
    pub fixed_peak_to_peak: f32,
    pub fixed_min: f32,
    pub fixed_max: f32,
    pub step_interval: u64,
    pub avg_step_interval: u64,
    pub step_interval_variance: f32,
    pub crossing_count: u32,
    pub has_valid_steps: bool,
    pub step_count: u32,
    pub mode: DetectionMode,
}

impl AxisStepDetector {
    pub fn report(&self, axis: Axis) -> AxisReport {
        AxisReport {
            axis,
            linear_acceleration: self.linear_acceleration(),
            smoothed_acceleration: self.smoothed_acceleration(),
            threshold: self.threshold_value(),
            current_peak_to_peak: self.current_peak_to_peak(),
            fixed_peak_to_peak: self.fixed_peak_to_peak(),
            fixed_min: self.fixed_min(),
            fixed_max: self.fixed_max(),
            step_interval: self.step_interval(),
            avg_step_interval: self.avg_step_interval(),
            step_interval_variance: self.step_interval_variance(),
            crossing_count: self.crossing_threshold_count(),
            has_valid_steps: self.has_valid_steps(),
            step_count: self.step_count(),
            mode: self.mode(),
        }
    }
}

impl<L: StepListener> StepCounter<L> {
    pub fn reports(&self) -> [AxisReport; 3] {
        Axis::ALL.map(|axis| self.axis(axis).report(axis))
    }
}

const AXIS_COLUMNS: [&str; 9] = ["raw", "avg", "thld", "step", "int", "avgint", "var", "val", "p2p"];

/// Writes one CSV row per sample.
///
/// The `step` column holds a +/-0.5 marker that flips whenever the axis
/// registered a threshold crossing since the previous row.
#[derive(Debug, Clone)]
pub struct CsvTrace {
    start_ms: Option<u64>,
    crossing_counts: [u32; 3],
    markers: [f32; 3],
}

impl CsvTrace {
    pub const fn new() -> Self {
        Self {
            start_ms: None,
            crossing_counts: [0; 3],
            markers: [-0.5; 3],
        }
    }

    pub fn write_header<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("time")?;
        for axis in Axis::ALL {
            for column in AXIS_COLUMNS {
                write!(out, ",{}-{}", axis, column)?;
            }
        }
        out.write_str(",steps,axis\n")
    }

    /// Append the row for the sample just passed to `counter.count_steps`.
    pub fn write_row<W, L, T>(
        &mut self,
        out: &mut W,
        counter: &StepCounter<L>,
        sample: [T; 3],
        timestamp_ms: u64,
    ) -> fmt::Result
    where
        W: Write,
        L: StepListener,
        T: fmt::Display,
    {
        let start = *self.start_ms.get_or_insert(timestamp_ms);
        write!(out, "{}", timestamp_ms.saturating_sub(start))?;

        for (report, raw) in counter.reports().iter().zip(sample) {
            let index = report.axis.index();
            if report.crossing_count != self.crossing_counts[index] {
                self.crossing_counts[index] = report.crossing_count;
                self.markers[index] = -self.markers[index];
            }

            write!(
                out,
                ",{},{},{},{},{},{},{},{},{}",
                raw,
                report.smoothed_acceleration,
                report.threshold,
                self.markers[index],
                report.step_interval,
                report.avg_step_interval,
                report.step_interval_variance,
                report.has_valid_steps,
                report.fixed_peak_to_peak,
            )?;
        }

        writeln!(out, ",{},{}", counter.step_count(), counter.detected_axis_label())
    }

    /// Current crossing marker of `axis`.
    pub fn marker(&self, axis: Axis) -> f32 {
        self.markers[axis.index()]
    }
}

impl Default for CsvTrace {
    fn default() -> Self {
        Self::new()
    }
}
