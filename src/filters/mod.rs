/// Signal conditioning stages of the per-axis pipeline
///
/// Both filters run on raw accelerometer values in f32 space.
mod gravity;
mod moving_avg;

pub use gravity::GravityFilter;
pub use moving_avg::{MAX_WINDOW, MovingAverage};
