//! Alarm configuration and the next-occurrence search.

use serde::{Deserialize, Serialize};
use time::Weekday;

use crate::broken_down_time::weekday_bit;

/// How an alarm rings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    #[default]
    Off,
    /// Beep length grows by one millisecond per elapsed second.
    Gradual,
    /// Fixed-length beep every second.
    Loud,
}

impl AlarmMode {
    pub const ALL: [Self; 3] = [Self::Off, Self::Gradual, Self::Loud];
}

/// One of the two alarm slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmId {
    First,
    Second,
}

impl AlarmId {
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Mask of all seven weekday bits (Sunday is bit 0).
pub const ALL_WEEKDAYS: u8 = 0x7F;
/// Monday to Friday.
pub const WORKDAYS: u8 = 0x3E;

/// Persisted configuration of one alarm slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    pub mode: AlarmMode,
    pub hour: u8,
    pub minute: u8,
    /// Bit `i` enables weekday `i`, Sunday is bit 0.
    pub weekdays: u8,
}

impl AlarmConfig {
    #[must_use]
    pub const fn new(mode: AlarmMode, hour: u8, minute: u8, weekdays: u8) -> Self {
        Self {
            mode,
            hour,
            minute,
            weekdays,
        }
    }

    /// An alarm that can never ring is stored as `Off` instead of being rejected.
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        if self.weekdays & ALL_WEEKDAYS == 0 {
            self.mode = AlarmMode::Off;
        }
        self
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        !matches!(self.mode, AlarmMode::Off)
    }

    #[must_use]
    pub const fn is_enabled_on(&self, weekday: Weekday) -> bool {
        self.weekdays & weekday_bit(weekday) != 0
    }

    /// Time of day this alarm rings on `weekday`, or [`AlarmTime::INVALID`].
    #[must_use]
    pub const fn time_on(&self, weekday: Weekday) -> AlarmTime {
        if self.is_on() && self.is_enabled_on(weekday) {
            AlarmTime::new(self.hour, self.minute)
        } else {
            AlarmTime::INVALID
        }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::new(AlarmMode::Off, 6, 0, WORKDAYS)
    }
}

/// Hour and minute of an alarm occurrence.
///
/// Field order gives chronological ordering; [`AlarmTime::INVALID`] sorts after every real
/// time so the minimum of two candidates is the earlier valid one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    pub hour: u8,
    pub minute: u8,
}

impl AlarmTime {
    pub const INVALID: Self = Self::new(99, 99);

    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

/// A found alarm occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextAlarm {
    pub weekday: Weekday,
    pub time: AlarmTime,
}

/// Find the chronologically next alarm strictly after `time` on `weekday`.
///
/// Same-day candidates must be later than `time`. Following days are scanned in order
/// with no time constraint, up to the same weekday one week later, so an alarm earlier
/// on today's weekday is still found.
#[must_use]
pub fn next_alarm_after(
    alarms: &[AlarmConfig; 2],
    weekday: Weekday,
    time: AlarmTime,
) -> Option<NextAlarm> {
    let same_day = alarms
        .iter()
        .map(|alarm| alarm.time_on(weekday))
        .filter(|candidate| *candidate > time)
        .min()
        .unwrap_or(AlarmTime::INVALID);
    if same_day.is_valid() {
        return Some(NextAlarm {
            weekday,
            time: same_day,
        });
    }

    let mut day = weekday;
    for _ in 0..7 {
        day = day.next();
        let earliest = alarms
            .iter()
            .map(|alarm| alarm.time_on(day))
            .min()
            .unwrap_or(AlarmTime::INVALID);
        if earliest.is_valid() {
            return Some(NextAlarm {
                weekday: day,
                time: earliest,
            });
        }
    }
    None
}

/// The next alarm that will actually ring.
///
/// With `skip_next` set, the first occurrence is consumed by the skip, so the search runs
/// again from just after it.
#[must_use]
pub fn next_alarm(
    alarms: &[AlarmConfig; 2],
    weekday: Weekday,
    time: AlarmTime,
    skip_next: bool,
) -> Option<NextAlarm> {
    let first = next_alarm_after(alarms, weekday, time)?;
    if skip_next {
        next_alarm_after(alarms, first.weekday, first.time)
    } else {
        Some(first)
    }
}
