//! The buzzer.

use embedded_hal::digital::OutputPin;

use crate::shared_constants::FRAME_RATE;

const MS_PER_FRAME: u32 = 1000 / FRAME_RATE as u32;

/// Something that can beep without blocking the frame loop.
pub trait Buzzer {
    /// Start a beep of `duration_ms`, replacing any beep in progress.
    fn beep_for_ms(&mut self, duration_ms: u32);

    /// Called once per frame to end beeps on time.
    fn tick(&mut self) {}
}

/// A buzzer that stays quiet, for builds without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentBuzzer;

impl Buzzer for SilentBuzzer {
    fn beep_for_ms(&mut self, duration_ms: u32) {
        trace!("Silent beep for {} ms", duration_ms);
    }
}

/// An active buzzer switched by a GPIO, timed in frames.
pub struct PinBuzzer<P> {
    pin: P,
    remaining_ms: u32,
}

impl<P: OutputPin> PinBuzzer<P> {
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("Buzzer pin not writable");
        }
        Self {
            pin,
            remaining_ms: 0,
        }
    }

    #[must_use]
    pub const fn is_beeping(&self) -> bool {
        self.remaining_ms > 0
    }
}

impl<P: OutputPin> Buzzer for PinBuzzer<P> {
    fn beep_for_ms(&mut self, duration_ms: u32) {
        self.remaining_ms = duration_ms;
        if duration_ms > 0 && self.pin.set_high().is_err() {
            warn!("Buzzer pin not writable");
        }
    }

    fn tick(&mut self) {
        if self.remaining_ms == 0 {
            return;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(MS_PER_FRAME);
        if self.remaining_ms == 0 && self.pin.set_low().is_err() {
            warn!("Buzzer pin not writable");
        }
    }
}
