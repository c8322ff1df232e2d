/// Gravity separation by an inverted low-pass filter
///
/// Tracks gravity with a single-pole low-pass and returns what is left over,
/// the linear acceleration: `gravity = alpha * gravity + (1 - alpha) * raw`.
#[derive(Debug, Clone, Copy)]
pub struct GravityFilter {
    alpha: f32,
    gravity: f32,
}

impl GravityFilter {
    /// Create new filter. `alpha` is the weight of the previous gravity estimate.
    pub const fn new(alpha: f32) -> Self {
        Self {
            alpha,
            gravity: 0.0,
        }
    }

    /// Feed one raw sample and return its linear acceleration.
    ///
    /// The estimate starts at zero, so a constant input shows up as a
    /// decaying transient until gravity has settled.
    pub fn apply(&mut self, raw: f32) -> f32 {
        debug_assert!(
            self.alpha >= 0.0 && self.alpha < 1.0,
            "gravity alpha must be in range [0.0, 1.0), got {}",
            self.alpha
        );

        self.gravity = self.alpha * self.gravity + (1.0 - self.alpha) * raw;
        raw - self.gravity
    }

    /// Current gravity estimate
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn reset(&mut self) {
        self.gravity = 0.0;
    }
}

impl Default for GravityFilter {
    fn default() -> Self {
        Self::new(0.8)
    }
}
