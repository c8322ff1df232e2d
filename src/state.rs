/// Signal values of one axis as of the last update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// Raw sample with gravity removed
    pub linear_acceleration: f32,
    /// Linear acceleration after smoothing
    pub smoothed: f32,
    /// Smoothed value of the previous update, used for crossing detection
    pub last_smoothed: f32,
    pub threshold: f32,
    /// Downward threshold crossings that passed the peak gate
    pub crossing_count: u32,
    /// Set only during an update that added validated steps
    pub has_valid_steps: bool,
}

impl AxisState {
    /// Smoothed signal fell through `threshold` since the previous update.
    #[inline]
    pub fn crossed_below(&self, threshold: f32) -> bool {
        self.last_smoothed > threshold && self.smoothed < threshold
    }
}
