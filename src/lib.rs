#![cfg_attr(not(test), no_std)]

mod config;
mod state;
mod counter;
pub mod axis;
pub mod cadence;
pub mod detector;
pub mod filters;
pub mod threshold;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

pub use config::{Config, ConfigError};
pub use state::AxisState;
pub use counter::{NoListener, StepCounter, StepListener, best_axis};
pub use axis::Axis;
pub use cadence::{CadenceLimits, CadenceValidator, DetectionMode};
pub use detector::AxisStepDetector;
pub use threshold::{AdaptiveThreshold, Envelope};

#[cfg(feature = "diagnostics")]
pub use diagnostics::{AxisReport, CsvTrace};
