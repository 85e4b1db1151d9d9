//! The battery-backed hardware clock seen from the engine.

use crate::{Result, broken_down_time::BrokenDownTime};

/// A hardware real-time clock.
///
/// Times are DST-unaware local standard time: the engine adds daylight saving itself and
/// never writes the DST hour to the chip. Failures are transient: the engine abandons the
/// current sync step and keeps free-running.
pub trait HardwareClock {
    /// Read the current time.
    ///
    /// # Errors
    ///
    /// Returns a bus or data error; the engine treats either as "no answer this time".
    fn read(&mut self) -> Result<BrokenDownTime>;

    /// Set the current time.
    ///
    /// # Errors
    ///
    /// Returns a bus error; the engine retries on the next second boundary.
    fn write(&mut self, time: &BrokenDownTime) -> Result<()>;

    /// Latest filtered temperature in °C, if the chip has a sensor.
    ///
    /// Reading is cheap: it only returns the cached value and flags that a fresh sample is
    /// wanted. The sample itself is taken by [`sample_temperature`](Self::sample_temperature).
    fn temperature(&mut self) -> Option<f32> {
        None
    }

    /// Take the requested temperature sample. Called once per second outside the frame
    /// render, since the bus transfer is too slow for a frame.
    fn sample_temperature(&mut self) {}
}
