//! Adaptive crossing threshold.
//!
//! Tracks the peak-to-peak envelope of a smoothed signal. The envelope of the
//! cycle in progress ("current") is promoted to the "fixed" envelope when a
//! window of samples has elapsed or when the caller restarts the peak search.
//! The threshold is the midpoint of the fixed envelope, so it always comes
//! from a cycle that has already completed.

/// Min/max pair of a signal over some span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Envelope {
    pub min: f32,
    pub max: f32,
}

impl Envelope {
    pub const fn at(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn include(&mut self, value: f32) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn peak_to_peak(&self) -> f32 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f32 {
        self.min + (self.max - self.min) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveThreshold {
    window: usize,
    samples: usize,
    current: Option<Envelope>,
    fixed: Envelope,
    threshold: f32,
}

impl AdaptiveThreshold {
    /// `window` is the number of samples after which the current envelope is
    /// finalized even if no peak search restart happened.
    pub fn new(window: usize) -> Self {
        debug_assert!(window > 0);

        Self {
            window: window.max(1),
            samples: 0,
            current: None,
            fixed: Envelope::default(),
            threshold: 0.0,
        }
    }

    pub fn push_sample(&mut self, value: f32) {
        match self.current.as_mut() {
            Some(envelope) => envelope.include(value),
            None => self.current = Some(Envelope::at(value)),
        }

        self.samples += 1;
        if self.samples >= self.window {
            self.finalize();
        }
    }

    /// Restart the peak search at `value`.
    ///
    /// The envelope collected so far becomes the fixed envelope.
    pub fn set_current_min_max(&mut self, value: f32) {
        self.finalize();
        self.current = Some(Envelope::at(value));
    }

    fn finalize(&mut self) {
        if let Some(envelope) = self.current.take() {
            self.fixed = envelope;
            self.threshold = envelope.midpoint();
        }
        self.samples = 0;
    }

    pub fn threshold_value(&self) -> f32 {
        self.threshold
    }

    pub fn fixed_peak_to_peak(&self) -> f32 {
        self.fixed.peak_to_peak()
    }

    pub fn current_peak_to_peak(&self) -> f32 {
        self.current.map_or(0.0, |envelope| envelope.peak_to_peak())
    }

    pub fn fixed_min(&self) -> f32 {
        self.fixed.min
    }

    pub fn fixed_max(&self) -> f32 {
        self.fixed.max
    }

    pub fn current_min(&self) -> f32 {
        self.current.map_or(0.0, |envelope| envelope.min)
    }

    pub fn current_max(&self) -> f32 {
        self.current.map_or(0.0, |envelope| envelope.max)
    }
}
