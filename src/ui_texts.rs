//! User-visible strings. English only.

use crate::{alarm::AlarmMode, settings::HourlyChime, wifi_status::WifiStatus};

pub const ALARMS: &str = "Alarms";
pub const WIFI_COLON: &str = "Wifi: ";
pub const OPTIONS: &str = "Options";
pub const EXIT: &str = "Exit";

pub const ALARM_1_COLON: &str = "Al 1: ";
pub const ALARM_2_COLON: &str = "Al 2: ";
pub const SKIP_NEXT_ALARM_COLON: &str = "Skip next alarm: ";
pub const NEXT_COLON: &str = "Next: ";

pub const AUTO_SCROLL_COLON: &str = "Auto scroll: ";
pub const TIME_FORMAT_COLON: &str = "Time format: ";
pub const HOURLY_CHIME_COLON: &str = "Hourly chime: ";
pub const AUTO_LIGHT_COLON: &str = "Auto light: ";
pub const BRIGHTNESS_COLON: &str = "Brightness: ";
pub const BRIGHTNESS_DARK_COLON: &str = "Dark: ";
pub const BRIGHTNESS_DIM_COLON: &str = "Dim: ";
pub const BRIGHTNESS_BRIGHT_COLON: &str = "Bright: ";
pub const FORMAT_24H: &str = "24h";
pub const FORMAT_12H: &str = "12h";

pub const ON: &str = "On";
pub const OFF: &str = "Off";
pub const DAY: &str = "Day";

pub const STOPWATCH: &str = "Stopwatch";
pub const RESET: &str = "Reset";
pub const COUNTDOWN: &str = "Countdown";
pub const SET: &str = "Set";

#[must_use]
pub const fn on_off(on: bool) -> &'static str {
    if on { ON } else { OFF }
}

#[must_use]
pub const fn alarm_mode(mode: AlarmMode) -> &'static str {
    match mode {
        AlarmMode::Off => OFF,
        AlarmMode::Gradual => "Gradual",
        AlarmMode::Loud => "Loud",
    }
}

#[must_use]
pub const fn hourly_chime(chime: HourlyChime) -> &'static str {
    match chime {
        HourlyChime::Off => OFF,
        HourlyChime::On => ON,
        HourlyChime::DaylightOnly => DAY,
    }
}

#[must_use]
pub const fn wifi_status(status: WifiStatus) -> &'static str {
    match status {
        WifiStatus::Unknown => "Unknown",
        WifiStatus::Ok => "OK",
        WifiStatus::NotAvailable => "Not available",
        WifiStatus::Down => "Down",
        WifiStatus::Connecting => "Connecting",
        WifiStatus::NoIp => "No IP",
        WifiStatus::Connected => "Connected",
        WifiStatus::ConnectionFailed => "Connection failed",
        WifiStatus::NoNetworkFound => "No network found",
        WifiStatus::AuthenticationFailed => "Authentication failed",
    }
}
