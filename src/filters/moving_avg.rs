use heapless::Vec;

/// Largest supported smoothing window.
pub const MAX_WINDOW: usize = 32;

/// Simple moving average over the most recent `window_size` samples
///
/// Circular buffer with a running sum. RAM cost: window_size * 4 bytes.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buffer: Vec<f32, MAX_WINDOW>,
    window_size: usize,
    index: usize,
    sum: f32,
}

impl MovingAverage {
    /// Create new moving average
    ///
    /// window_size must be > 0 and <= 32
    pub fn new(window_size: usize) -> Self {
        debug_assert!(window_size > 0 && window_size <= MAX_WINDOW);

        Self {
            buffer: Vec::new(),
            window_size: window_size.clamp(1, MAX_WINDOW),
            index: 0,
            sum: 0.0,
        }
    }

    /// Push a sample into the window.
    pub fn push(&mut self, value: f32) {
        if self.buffer.len() < self.window_size {
            let _ = self.buffer.push(value);
            self.sum += value;
        } else {
            self.sum += value - self.buffer[self.index];
            self.buffer[self.index] = value;
        }

        self.index = (self.index + 1) % self.window_size;

        // Once per revolution, rebuild the sum so rounding error stays bounded
        if self.index == 0 {
            self.sum = self.buffer.iter().sum();
        }
    }

    /// Mean of the samples in the window.
    ///
    /// Until the window is full, averages all samples received so far.
    /// Returns 0.0 before the first push.
    pub fn value(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.sum / self.buffer.len() as f32
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of samples currently averaged.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.index = 0;
        self.sum = 0.0;
    }
}
