//! User settings, with debounced persistence.
//!
//! Every call to [`Settings::modify`] (re)arms a countdown. Only when no further change
//! arrives for [`SETTINGS_WRITE_DELAY`] does [`Settings::tick`] report that the values
//! should be written, sparing the flash from a write per button press.

use serde::{Deserialize, Serialize};

use crate::{
    alarm::{AlarmConfig, AlarmId},
    shared_constants::{FRAME_RATE, SETTINGS_WRITE_DELAY},
};

/// When the hourly chime sounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourlyChime {
    #[default]
    Off,
    On,
    /// Only while the room is lit, so it never wakes anybody.
    DaylightOnly,
}

impl HourlyChime {
    pub const ALL: [Self; 3] = [Self::Off, Self::On, Self::DaylightOnly];
}

/// Everything the user can configure. Persisted with postcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsValues {
    /// Index of the selected screen in the root menu.
    pub selected_screen: u8,
    pub auto_scroll: bool,
    pub use_celsius: bool,
    pub format_24h: bool,
    pub hourly_chime: HourlyChime,
    pub auto_light: bool,
    pub alarms: [AlarmConfig; 2],
    pub skip_next_alarm: bool,
    pub countdown_start_minute: u8,
    pub countdown_start_second: u8,
    /// Brightness in percent when automatic brightness is off.
    pub manual_brightness: i16,
    /// Automatic brightness in total darkness. May be negative to dim below the minimum.
    pub brightness_dark: i16,
    /// Automatic brightness at the daylight threshold.
    pub brightness_dim: i16,
    /// Automatic brightness in full daylight.
    pub brightness_bright: i16,
}

impl SettingsValues {
    #[must_use]
    pub const fn alarm(&self, id: AlarmId) -> &AlarmConfig {
        match id {
            AlarmId::First => &self.alarms[0],
            AlarmId::Second => &self.alarms[1],
        }
    }

    pub const fn alarm_mut(&mut self, id: AlarmId) -> &mut AlarmConfig {
        match id {
            AlarmId::First => &mut self.alarms[0],
            AlarmId::Second => &mut self.alarms[1],
        }
    }
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            selected_screen: 1,
            auto_scroll: false,
            use_celsius: true,
            format_24h: true,
            hourly_chime: HourlyChime::Off,
            auto_light: true,
            alarms: [AlarmConfig::default(); 2],
            skip_next_alarm: false,
            countdown_start_minute: 1,
            countdown_start_second: 0,
            manual_brightness: 100,
            brightness_dark: -20,
            brightness_dim: 55,
            brightness_bright: 100,
        }
    }
}

/// Frames between the last modification and the write.
pub const WRITE_DELAY_FRAMES: u32 = SETTINGS_WRITE_DELAY.as_secs() as u32 * FRAME_RATE as u32;

/// Live settings plus the pending-write countdown.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    values: SettingsValues,
    frames_until_write: Option<u32>,
}

impl Settings {
    #[must_use]
    pub const fn new(values: SettingsValues) -> Self {
        Self {
            values,
            frames_until_write: None,
        }
    }

    #[must_use]
    pub const fn get(&self) -> &SettingsValues {
        &self.values
    }

    /// Mutable access. Schedules a write [`SETTINGS_WRITE_DELAY`] from now.
    pub const fn modify(&mut self) -> &mut SettingsValues {
        self.frames_until_write = Some(WRITE_DELAY_FRAMES);
        &mut self.values
    }

    /// Advance the write countdown by one frame. Returns `true` exactly once when the
    /// debounced write is due.
    pub fn tick(&mut self) -> bool {
        match self.frames_until_write {
            Some(0 | 1) => {
                self.frames_until_write = None;
                true
            }
            Some(frames) => {
                self.frames_until_write = Some(frames - 1);
                false
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn is_write_pending(&self) -> bool {
        self.frames_until_write.is_some()
    }
}
