//! The three front-panel buttons.
//!
//! A [`ButtonInput`] watches one pin, debounces it and posts [`ButtonEvent`]s to the
//! [`ClockInbox`]: one `Pressed` when the button goes down, then `Repeated` every
//! [`BUTTON_REPEAT_DELAY`] while it stays down.

use embassy_futures::select::{Either, select};
use embassy_time::Timer;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::{
    inbox::{ClockEvent, ClockInbox},
    shared_constants::{BUTTON_DEBOUNCE_DELAY, BUTTON_REPEAT_DELAY},
};

/// Which button.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Set,
    Up,
    Down,
}

// Instead of describing the first press vs. auto-repeat with a `bool`, we define an `enum`
// to clarify what each state represents.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// The button just went down.
    Pressed,
    /// The button is still held; sent every [`BUTTON_REPEAT_DELAY`].
    Repeated,
}

/// A debounced button event.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub kind: PressKind,
}

impl ButtonEvent {
    #[must_use]
    pub const fn pressed(button: ButtonId) -> Self {
        Self {
            button,
            kind: PressKind::Pressed,
        }
    }

    #[must_use]
    pub const fn repeated(button: ButtonId) -> Self {
        Self {
            button,
            kind: PressKind::Repeated,
        }
    }
}

/// Electrical level of a pressed button.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Button to ground with a pull-up, the usual wiring.
    #[default]
    Low,
    High,
}

/// One button pin feeding the inbox.
pub struct ButtonInput<P> {
    pin: P,
    button: ButtonId,
    active: ActiveLevel,
}

impl<P: InputPin + Wait> ButtonInput<P> {
    #[must_use]
    pub const fn new(pin: P, button: ButtonId, active: ActiveLevel) -> Self {
        Self {
            pin,
            button,
            active,
        }
    }

    /// Watch the pin forever, posting events to `inbox`.
    pub async fn run(&mut self, inbox: &ClockInbox) -> ! {
        loop {
            self.wait_for_button_down().await;

            // Sometimes the start (and end) of a press can be "noisy". Ignore the pin
            // during that window, then check it is really still down.
            self.debounce_delay().await;
            if !self.is_down() {
                continue;
            }

            self.post(ButtonEvent::pressed(self.button), inbox);
            loop {
                match select(self.wait_for_button_up(), Timer::after(BUTTON_REPEAT_DELAY)).await {
                    Either::First(()) => break,
                    Either::Second(()) => self.post(ButtonEvent::repeated(self.button), inbox),
                }
            }
            self.debounce_delay().await;
        }
    }

    fn post(&self, event: ButtonEvent, inbox: &ClockInbox) {
        debug!("Button event: {:?}", event);
        // A full inbox means the UI is behind; dropping a press is the right outcome.
        let _ = inbox.post(ClockEvent::Button(event));
    }

    fn is_down(&mut self) -> bool {
        let result = match self.active {
            ActiveLevel::Low => self.pin.is_low(),
            ActiveLevel::High => self.pin.is_high(),
        };
        result.unwrap_or(false)
    }

    /// Pause for a predetermined time to let the button's state become consistent.
    async fn debounce_delay(&mut self) {
        Timer::after(BUTTON_DEBOUNCE_DELAY).await;
    }

    async fn wait_for_button_down(&mut self) {
        let result = match self.active {
            ActiveLevel::Low => self.pin.wait_for_low().await,
            ActiveLevel::High => self.pin.wait_for_high().await,
        };
        if result.is_err() {
            // A pin that cannot wait is polled at the debounce rate instead.
            Timer::after(BUTTON_DEBOUNCE_DELAY).await;
        }
    }

    async fn wait_for_button_up(&mut self) {
        let result = match self.active {
            ActiveLevel::Low => self.pin.wait_for_high().await,
            ActiveLevel::High => self.pin.wait_for_low().await,
        };
        if result.is_err() {
            Timer::after(BUTTON_DEBOUNCE_DELAY).await;
        }
    }
}
