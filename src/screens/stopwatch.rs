use super::{EditState, Screen, ScreenContext};
use crate::{
    bitmap::{Bitmap, Font, Indicator},
    cyclic_counter::CyclicCounter,
    rtc::HardwareClock,
    shared_constants::FRAME_RATE,
};

/// Counts up: `SS:cc` in the first minute, `MM:SS` afterwards. Set starts and stops it.
#[derive(Clone, Debug)]
pub struct StopwatchScreen {
    running: bool,
    minute: CyclicCounter,
    second: CyclicCounter,
    tick: CyclicCounter,
}

impl StopwatchScreen {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: false,
            minute: CyclicCounter::new(60),
            second: CyclicCounter::new(60),
            tick: CyclicCounter::new(FRAME_RATE),
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed `(minutes, seconds, frames)`.
    #[must_use]
    pub const fn elapsed(&self) -> (i32, i32, i32) {
        (self.minute.value(), self.second.value(), self.tick.value())
    }

    /// Back to zero. A running stopwatch keeps running.
    pub const fn reset(&mut self) {
        self.minute.set(0);
        self.second.set(0);
        self.tick.set(0);
    }
}

impl Default for StopwatchScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HardwareClock> Screen<R> for StopwatchScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        _edit: EditState,
        full_refresh: bool,
        _ctx: &mut ScreenContext<'_, R>,
    ) {
        if !full_refresh && !self.running {
            return;
        }
        frame.clear();
        let (minute, second, tick) = self.elapsed();
        let (left, right) = if minute == 0 {
            (second, tick * 100 / i32::from(FRAME_RATE))
        } else {
            (minute, second)
        };
        for (x, value) in [(0, left), (13, right)] {
            let value = u8::try_from(value).unwrap_or(0);
            frame.draw_two_digits(x, 0, Font::Classic, value, true);
        }
        frame.draw_middle_dots(true);
        frame.put_indicator(Indicator::CountUp, true);
    }

    fn activate(&mut self, _edit: EditState, _ctx: &mut ScreenContext<'_, R>) {
        self.running = !self.running;
        debug!("Stopwatch running: {}", self.running);
    }

    fn tick(&mut self, _ctx: &mut ScreenContext<'_, R>) {
        if self.running && self.tick.increment() && self.second.increment() {
            self.minute.increment();
        }
    }
}
