//! Fixed-window average used to smooth noisy analog samples (ambient light, die temperature).

/// Running mean over the last `N` samples.
#[derive(Clone, Debug)]
pub struct MovingAverage<const N: usize> {
    samples: [f32; N],
    next: usize,
    sum: f32,
}

impl<const N: usize> MovingAverage<N> {
    /// Create a window already filled with `initial`, so the first reads are meaningful.
    #[must_use]
    pub fn new(initial: f32) -> Self {
        #[expect(
            clippy::cast_precision_loss,
            reason = "window sizes are small powers of two"
        )]
        let sum = initial * N as f32;
        Self {
            samples: [initial; N],
            next: 0,
            sum,
        }
    }

    pub fn put(&mut self, sample: f32) {
        if let Some(slot) = self.samples.get_mut(self.next) {
            self.sum += sample - *slot;
            *slot = sample;
        }
        self.next = (self.next + 1) % N.max(1);
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        if N == 0 {
            return 0.0;
        }
        #[expect(
            clippy::cast_precision_loss,
            reason = "window sizes are small powers of two"
        )]
        let len = N as f32;
        self.sum / len
    }
}
