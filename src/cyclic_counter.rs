//! Wrapping frame counter shared by the engine, the scroll animators and the blink phase.

/// A counter that cycles through `0..wrap`.
///
/// The value `-1` is a stopped state: [`CyclicCounter::increment`] moves it to `0`, which is
/// how an edit session restarts its blink phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CyclicCounter {
    wrap: i32,
    value: i32,
}

impl CyclicCounter {
    /// Create a counter starting at `0`. `wrap` must be at least 1.
    #[must_use]
    pub const fn new(wrap: u16) -> Self {
        Self::starting_at(wrap, 0)
    }

    /// Create a counter starting at `value` (may be `-1` for the stopped state).
    #[must_use]
    pub const fn starting_at(wrap: u16, value: i32) -> Self {
        let wrap = if wrap == 0 { 1 } else { wrap as i32 };
        Self { wrap, value }
    }

    /// Advance by one. Returns `true` when the counter wrapped back to `0`.
    pub const fn increment(&mut self) -> bool {
        self.value += 1;
        if self.value >= self.wrap {
            self.value = 0;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.value
    }

    #[must_use]
    pub const fn wrap(self) -> i32 {
        self.wrap
    }

    /// Set the value, reduced into range. Negative values stop the counter.
    pub const fn set(&mut self, value: i32) {
        self.value = if value < 0 { -1 } else { value % self.wrap };
    }

    /// Change the period. The current value is reduced into the new range.
    pub const fn set_wrap(&mut self, wrap: u16) {
        self.wrap = if wrap == 0 { 1 } else { wrap as i32 };
        if self.value >= self.wrap {
            self.value %= self.wrap;
        }
    }

    /// Rescale the current position to a new period, keeping the same fraction of a cycle.
    pub const fn rescale(&mut self, numerator: i32, denominator: i32) {
        if denominator > 0 && numerator >= 0 {
            self.value = (numerator * self.wrap / denominator) % self.wrap;
        }
    }

    pub const fn stop(&mut self) {
        self.value = -1;
    }

    #[must_use]
    pub const fn is_stopped(self) -> bool {
        self.value < 0
    }
}
