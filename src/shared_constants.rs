use embassy_time::Duration;

/// Display frames per second. Every per-frame counter in the crate is sized from this.
pub const FRAME_RATE: u16 = 125;
pub const FRAME_PERIOD: Duration = Duration::from_micros(1_000_000 / FRAME_RATE as u64);

pub const ONE_SECOND: Duration = Duration::from_secs(1);
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * 60;
pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

// Physical display is 24x8; the time matrix sits inside the indicator border.
pub const DISPLAY_WIDTH: i32 = 24;
pub const DISPLAY_HEIGHT: i32 = 8;
pub const MATRIX_LEFT: i32 = 2;
pub const MATRIX_TOP: i32 = 1;
pub const MATRIX_WIDTH: i32 = 22;
pub const MATRIX_HEIGHT: i32 = 7;

pub const BUTTON_DEBOUNCE_DELAY: Duration = Duration::from_millis(10);
pub const BUTTON_REPEAT_DELAY: Duration = Duration::from_millis(500);

/// Ambient light (0..=100) at and above which the room counts as daylight.
pub const DIM_AMBIENT_LIGHT: f32 = 10.0;
pub const BRIGHTNESS_BOOST_AFTER_INPUT_SECS: u32 = 5;
pub const BRIGHTNESS_BOOST_PERCENT: f32 = 20.0;

pub const STOP_RINGING_AFTER_SECS: u32 = 300;
pub const AUTO_SCROLL_IDLE_SECS: u32 = 20;
pub const LOUD_ALARM_BEEP_MS: u32 = 500;
pub const HOURLY_CHIME_BEEP_MS: u32 = 100;
pub const COUNTDOWN_BEEP_MS: u32 = 50;

pub const SETTINGS_WRITE_DELAY: Duration = Duration::from_secs(60);
pub const NTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Horizontal text scroll dwell at either end.
pub const SCROLL_PAUSE_FRAMES: u16 = FRAME_RATE * 2;
/// Frames per pixel of horizontal text scroll.
pub const SCROLL_FRAME_DIVIDER: u16 = FRAME_RATE / 25;
/// Frames per row of vertical menu transition.
pub const VERTICAL_SCROLL_FRAME_DIVIDER: u16 = FRAME_RATE / 25;
/// Blink phase frame at which the edited value disappears.
pub const BLINK_DISAPPEAR_FRAME: i32 = FRAME_RATE as i32 / 2 + 1;
