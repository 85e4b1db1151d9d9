//! Fakes shared by the integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::VecDeque;

use clock_kit::{
    Error, Result,
    broken_down_time::BrokenDownTime,
    config::ClockConfig,
    display::VirtualDisplay,
    engine::TimeEngine,
    rtc::HardwareClock,
    settings_block::MemoryStorage,
    sound::Buzzer,
    ui::ClockUi,
};

/// A hardware clock that answers reads from a script and records writes.
///
/// Once the script is exhausted every read fails with a bus error.
#[derive(Debug, Default)]
pub struct ScriptedClock {
    reads: VecDeque<Result<BrokenDownTime>>,
    writes: Vec<BrokenDownTime>,
    temperature: Option<f32>,
    temperature_samples: u32,
}

impl ScriptedClock {
    pub fn new(reads: impl IntoIterator<Item = Result<BrokenDownTime>>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A clock whose first read is `before`, then ticks over to `after`.
    pub fn ticking(before: BrokenDownTime, after: BrokenDownTime) -> Self {
        Self::new([Ok(before), Ok(after)])
    }

    #[must_use]
    pub fn with_temperature(mut self, celsius: f32) -> Self {
        self.temperature = Some(celsius);
        self
    }

    pub fn writes(&self) -> &[BrokenDownTime] {
        &self.writes
    }

    pub const fn temperature_samples(&self) -> u32 {
        self.temperature_samples
    }
}

impl HardwareClock for ScriptedClock {
    fn read(&mut self) -> Result<BrokenDownTime> {
        self.reads.pop_front().unwrap_or(Err(Error::HardwareClockBus))
    }

    fn write(&mut self, time: &BrokenDownTime) -> Result<()> {
        self.writes.push(*time);
        Ok(())
    }

    fn temperature(&mut self) -> Option<f32> {
        self.temperature
    }

    fn sample_temperature(&mut self) {
        self.temperature_samples += 1;
    }
}

/// A buzzer that remembers every beep.
#[derive(Debug, Default)]
pub struct RecordingBuzzer {
    pub beeps: Vec<u32>,
}

impl Buzzer for RecordingBuzzer {
    fn beep_for_ms(&mut self, duration_ms: u32) {
        self.beeps.push(duration_ms);
    }
}

pub type TestUi = ClockUi<ScriptedClock, VirtualDisplay, RecordingBuzzer, MemoryStorage>;

pub fn date_time(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
) -> BrokenDownTime {
    BrokenDownTime::new(year, month, day, hour, minute, second).expect("valid calendar time")
}

/// An engine without a hardware clock, in UTC.
pub fn free_running_engine() -> TimeEngine<ScriptedClock> {
    TimeEngine::new(None, ClockConfig::default())
}

/// Route the crate's `log` output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A UI without a hardware clock, in a well-lit room, with the given storage.
pub fn ui_with_storage(storage: MemoryStorage) -> TestUi {
    init_logging();
    ClockUi::new(
        free_running_engine(),
        VirtualDisplay::with_ambient_light(50.0),
        RecordingBuzzer::default(),
        storage,
    )
}

pub fn ui() -> TestUi {
    ui_with_storage(MemoryStorage::new())
}

pub fn tick_n(ui: &mut TestUi, frames: u32) {
    for _ in 0..frames {
        ui.tick();
    }
}
