//! Deferred input for the frame loop.
//!
//! Buttons, the network task and the once-per-second timer all run outside the frame.
//! Instead of touching the engine from there, they post a [`ClockEvent`] here. The UI
//! drains the inbox at the start of the next frame, so the engine and the menu state have
//! exactly one writer.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

use crate::{
    Error, Result,
    button::ButtonEvent,
    ntp::{NtpFailure, NtpTime},
    wifi_status::WifiStatus,
};

/// Capacity of the inbox. A frame drains everything, so this only has to absorb a burst.
pub const INBOX_CAPACITY: usize = 8;

/// Something that happened outside the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockEvent {
    Button(ButtonEvent),
    NetworkTime(NtpTime),
    NetworkTimeFailed(NtpFailure),
    WifiStatus(WifiStatus),
    /// The periodic hook that takes slow samples (temperature).
    SecondElapsed,
}

/// Interrupt-safe single-consumer event queue.
pub struct ClockInbox(Channel<CriticalSectionRawMutex, ClockEvent, INBOX_CAPACITY>);

impl ClockInbox {
    /// Create a new inbox, typically in a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self(Channel::new())
    }

    /// Post without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InboxFull`] if the frame loop has fallen behind; the event is dropped.
    pub fn post(&self, event: ClockEvent) -> Result<()> {
        self.0.try_send(event).map_err(|_| {
            warn!("Clock inbox full, dropping event");
            Error::InboxFull
        })
    }

    /// Post, waiting for room if the frame loop has fallen behind.
    ///
    /// For results that must not be lost, such as the outcome of a network time request.
    pub async fn send(&self, event: ClockEvent) {
        if self.0.is_full() {
            debug!("Clock inbox full, waiting for room");
        }
        self.0.send(event).await;
    }

    /// Take the oldest pending event, if any.
    pub fn take(&self) -> Option<ClockEvent> {
        self.0.try_receive().ok()
    }

    /// Iterate over pending events until the inbox is empty.
    pub fn drain(&self) -> impl Iterator<Item = ClockEvent> + '_ {
        core::iter::from_fn(|| self.take())
    }
}

impl Default for ClockInbox {
    fn default() -> Self {
        Self::new()
    }
}
