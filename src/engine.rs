//! The time engine: one authoritative local time, reconciled from three sources.
//!
//! - a frame counter that advances the time by one second every [`FRAME_RATE`] ticks
//! - an optional battery-backed [`HardwareClock`], adopted at power-up and updated after
//!   every network sync
//! - network time, delivered through the inbox and applied with
//!   [`TimeEngine::apply_network_time`]
//!
//! The stored epoch ([`LocalSeconds`]) never contains the DST hour; [`DstWindow`] adds it
//! only when expanding to calendar fields.

use core::mem;

use time::Weekday;

use crate::{
    alarm::{AlarmConfig, AlarmId, AlarmTime, NextAlarm, next_alarm},
    broken_down_time::BrokenDownTime,
    config::ClockConfig,
    cyclic_counter::CyclicCounter,
    dst::DstWindow,
    rtc::HardwareClock,
    settings::Settings,
    shared_constants::FRAME_RATE,
    unix_seconds::{LocalSeconds, UnixSeconds},
};

/// Reconciliation phase between the frame counter and the hardware clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// Polling the hardware clock every tick until its second changes, then adopting it.
    AdoptingFromHardwareClock,
    /// Writing the local time to the hardware clock at the next second boundary.
    PropagatingToHardwareClock,
    /// Free-running on the frame counter.
    Settled,
}

/// What one [`TimeEngine::tick`] produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// The time jumped (edit, hardware clock adoption, network time); redraw everything.
    pub time_adjusted: bool,
    pub fired_alarm: Option<AlarmId>,
}

/// Owner of the canonical time, the sync state machine and both alarm slots.
pub struct TimeEngine<R> {
    hardware_clock: Option<R>,
    config: ClockConfig,
    dst: DstWindow,
    ticks: CyclicCounter,
    time: LocalSeconds,
    now: BrokenDownTime,
    sync_state: SyncState,
    last_hardware_second: u8,
    alarms: [AlarmConfig; 2],
    time_adjusted: bool,
}

impl<R: HardwareClock> TimeEngine<R> {
    /// Start the engine, adopting the hardware clock's time if it answers.
    ///
    /// A hardware clock that fails its first read is released for good: the engine goes
    /// straight to [`SyncState::Settled`] and counts from the epoch until network time
    /// arrives.
    pub fn new(hardware_clock: Option<R>, config: ClockConfig) -> Self {
        let mut engine = Self {
            hardware_clock: None,
            config,
            dst: DstWindow::new(config.dst_region, config.utc_offset_minutes),
            ticks: CyclicCounter::new(FRAME_RATE),
            time: LocalSeconds::default(),
            now: BrokenDownTime {
                year: 1970,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0,
                weekday: Weekday::Thursday,
            },
            sync_state: SyncState::Settled,
            last_hardware_second: 0,
            alarms: [AlarmConfig::default(); 2],
            time_adjusted: true,
        };

        if let Some(mut clock) = hardware_clock {
            match clock.read() {
                Ok(initial) => {
                    engine.last_hardware_second = initial.second;
                    engine.hardware_clock = Some(clock);
                    engine.adopt_hardware_time(&initial);
                    engine.sync_state = SyncState::AdoptingFromHardwareClock;
                    info!("Hardware clock found, waiting for its next second");
                }
                Err(err) => {
                    warn!("Hardware clock not usable ({}), free-running", err);
                }
            }
        } else {
            info!("No hardware clock, free-running");
        }
        engine.refresh_calendar();
        engine
    }

    /// Advance one frame. Call exactly once per displayed frame.
    ///
    /// The first tick of each minute (second 0, tick 0) evaluates the alarms: the first
    /// alarm wins over the second, and a pending "skip next alarm" consumes the firing.
    pub fn tick(&mut self, settings: &mut Settings) -> TickOutcome {
        let fired_alarm = if self.ticks.value() == 0 && self.now.second == 0 {
            self.check_alarms(settings)
        } else {
            None
        };

        let second_boundary = self.ticks.increment();
        if self.sync_state == SyncState::AdoptingFromHardwareClock {
            self.poll_hardware_clock();
        } else if second_boundary {
            self.time = self.time.plus(1);
            self.refresh_calendar();
            if self.sync_state == SyncState::PropagatingToHardwareClock {
                self.propagate_to_hardware_clock();
            }
        }

        TickOutcome {
            time_adjusted: mem::take(&mut self.time_adjusted),
            fired_alarm,
        }
    }

    /// Replace the time with a network time, keeping its sub-second phase.
    ///
    /// The hardware clock is updated at the next second boundary.
    pub fn apply_network_time(&mut self, utc: UnixSeconds, millis: u16) {
        info!("Applying network time {}.{}", utc.as_i64(), millis);
        self.time = utc.to_local(self.config.utc_offset_minutes);
        self.ticks.rescale(i32::from(millis.min(999)), 1000);
        self.refresh_calendar();
        self.time_adjusted = true;
        if self.hardware_clock.is_some() {
            self.sync_state = SyncState::PropagatingToHardwareClock;
        }
    }

    /// Set the wall-clock time, as displayed (DST included).
    ///
    /// Invalid fields leave the time unchanged.
    pub fn set(&mut self, wall_clock: &BrokenDownTime) {
        match wall_clock.to_local() {
            Ok(seconds) => {
                self.time = self.dst.unconsider(seconds);
                self.refresh_calendar();
                self.time_adjusted = true;
            }
            Err(err) => warn!("Ignoring invalid time: {}", err),
        }
    }

    /// Restart the current second, so that an edit lands exactly on a second boundary.
    pub const fn reset_ticks(&mut self) {
        self.ticks.set(0);
    }

    /// Write the time to the hardware clock at the next second boundary.
    pub fn start_sync_to_hardware_clock(&mut self) {
        if self.hardware_clock.is_some() {
            self.sync_state = SyncState::PropagatingToHardwareClock;
        }
    }

    pub fn set_alarm(&mut self, id: AlarmId, alarm: AlarmConfig) {
        if let Some(slot) = self.alarms.get_mut(id.index()) {
            *slot = alarm.normalized();
        }
    }

    #[must_use]
    pub const fn alarms(&self) -> &[AlarmConfig; 2] {
        &self.alarms
    }

    #[must_use]
    pub fn is_alarm_on(&self) -> bool {
        self.alarms.iter().any(AlarmConfig::is_on)
    }

    /// Next alarm that will actually ring, honoring "skip next alarm".
    #[must_use]
    pub fn next_alarm(&self, skip_next: bool) -> Option<NextAlarm> {
        next_alarm(
            &self.alarms,
            self.now.weekday,
            AlarmTime::new(self.now.hour, self.now.minute),
            skip_next,
        )
    }

    /// The current wall-clock time (DST included).
    #[must_use]
    pub const fn now(&self) -> &BrokenDownTime {
        &self.now
    }

    /// The canonical DST-unaware epoch.
    #[must_use]
    pub const fn local_seconds(&self) -> LocalSeconds {
        self.time
    }

    /// Frame within the current second, `0..FRAME_RATE`.
    #[must_use]
    pub const fn tick_count(&self) -> i32 {
        self.ticks.value()
    }

    #[must_use]
    pub const fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    #[must_use]
    pub const fn has_hardware_clock(&self) -> bool {
        self.hardware_clock.is_some()
    }

    pub const fn hardware_clock_mut(&mut self) -> Option<&mut R> {
        self.hardware_clock.as_mut()
    }

    #[must_use]
    pub const fn dst(&self) -> &DstWindow {
        &self.dst
    }

    /// Filtered temperature in °C, if the hardware clock has a sensor.
    pub fn temperature(&mut self) -> Option<f32> {
        self.hardware_clock.as_mut()?.temperature()
    }

    /// Run the slow temperature sample requested by [`temperature`](Self::temperature).
    pub fn sample_temperature(&mut self) {
        if let Some(clock) = self.hardware_clock.as_mut() {
            clock.sample_temperature();
        }
    }

    fn check_alarms(&mut self, settings: &mut Settings) -> Option<AlarmId> {
        let reached = AlarmId::ALL
            .into_iter()
            .find(|id| self.alarm_reached(*id))?;
        if settings.get().skip_next_alarm {
            info!("Alarm {} skipped", reached.index() + 1);
            settings.modify().skip_next_alarm = false;
            return None;
        }
        info!("Alarm {} fired", reached.index() + 1);
        Some(reached)
    }

    fn alarm_reached(&self, id: AlarmId) -> bool {
        self.alarms.get(id.index()).is_some_and(|alarm| {
            alarm.is_on()
                && alarm.hour == self.now.hour
                && alarm.minute == self.now.minute
                && alarm.is_enabled_on(self.now.weekday)
        })
    }

    fn poll_hardware_clock(&mut self) {
        let Some(clock) = self.hardware_clock.as_mut() else {
            self.sync_state = SyncState::Settled;
            return;
        };
        match clock.read() {
            Ok(reading) if reading.second != self.last_hardware_second => {
                // The hardware clock just started a new second: adopt it, aligned.
                self.adopt_hardware_time(&reading);
                self.ticks.set(0);
                self.sync_state = SyncState::Settled;
                info!("Adopted hardware clock time");
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Hardware clock read failed ({}), free-running", err);
                self.sync_state = SyncState::Settled;
            }
        }
    }

    fn propagate_to_hardware_clock(&mut self) {
        let Some(clock) = self.hardware_clock.as_mut() else {
            self.sync_state = SyncState::Settled;
            return;
        };
        let standard_time = match BrokenDownTime::from_local(self.time) {
            Ok(standard_time) => standard_time,
            Err(err) => {
                warn!("Cannot express time for the hardware clock: {}", err);
                self.sync_state = SyncState::Settled;
                return;
            }
        };
        match clock.write(&standard_time) {
            Ok(()) => {
                self.sync_state = SyncState::Settled;
                info!("Hardware clock updated");
            }
            Err(err) => warn!("Hardware clock write failed ({}), retrying", err),
        }
    }

    /// Hardware clock values are DST-unaware already; store them as they are.
    fn adopt_hardware_time(&mut self, reading: &BrokenDownTime) {
        match reading.to_local() {
            Ok(seconds) => {
                self.time = seconds;
                self.refresh_calendar();
                self.time_adjusted = true;
            }
            Err(err) => warn!("Hardware clock time out of range: {}", err),
        }
    }

    fn refresh_calendar(&mut self) {
        let wall_clock = self.dst.consider(self.time);
        match BrokenDownTime::from_local(wall_clock) {
            Ok(now) => self.now = now,
            Err(err) => warn!("Time out of calendar range: {}", err),
        }
    }
}
