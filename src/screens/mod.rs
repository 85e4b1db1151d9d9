//! Screens: the selectable, renderable and optionally editable units of the UI.
//!
//! Every screen implements [`Screen`]. The orchestrator only ever talks to screens through
//! that trait; a screen in turn reaches the rest of the clock through a [`ScreenContext`]
//! and asks for UI-level changes (enter a menu, start editing, ...) by queueing
//! [`UiRequest`]s, applied by the orchestrator right after the call returns.
//!
//! Screens are stored by value in a [`ScreenRegistry`] as [`ScreenKind`] variants.

mod alarm;
mod countdown;
mod date;
mod menu;
mod options;
mod registry;
mod stopwatch;
mod temperature;
mod time;

use heapless::Vec;

pub use self::{
    alarm::{AlarmScreen, SkipNextAlarmScreen},
    countdown::{CountdownScreen, CountdownState},
    date::DateScreen,
    menu::{ActionKind, ActionScreen, SubmenuScreen, WifiStatusScreen},
    options::OptionsScreen,
    registry::{Menu, MenuId, ROOT_MENU, ScreenId, ScreenRegistry, SideTable},
    stopwatch::StopwatchScreen,
    temperature::TemperatureScreen,
    time::{TimeScreen, TimeStyle},
};
use crate::{
    bitmap::{Bitmap, Indicator},
    broken_down_time::convert_hour,
    engine::TimeEngine,
    field_editor::Direction,
    rtc::HardwareClock,
    scroll::HorizontalScroll,
    settings::{Settings, SettingsValues},
    sound::Buzzer,
    wifi_status::WifiStatus,
};

/// Capacity of the per-call request queue.
pub const MAX_REQUESTS: usize = 8;

/// Value index meaning "not editing".
pub const NO_EDITING: u8 = 0;

/// UI-level change requested by a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiRequest {
    /// Advance to the next editable value, or finish editing after the last one.
    EditNextValue,
    SetBlinkCounter(i32),
    ForceRefresh,
    BringScrollingToRight,
    /// Make `menu` current, selecting `select` if it is one of its entries.
    EnterMenu { menu: MenuId, select: Option<ScreenId> },
    /// Back to the parent menu, selecting the submenu that was left.
    ExitMenu,
    /// Select a screen of the current menu.
    SelectScreen(ScreenId),
    /// Stop the countdown, reload its start value and edit it.
    SetCountdown,
    /// Zero the stopwatch and show it.
    ResetStopwatch,
}

/// Edit state handed to [`Screen::render_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditState {
    /// [`NO_EDITING`], or the 1-based index of the edited value.
    pub value_index: u8,
    /// Frame within the blink cycle, -1 when not blinking. Values at or above
    /// [`BLINK_DISAPPEAR_FRAME`](crate::shared_constants::BLINK_DISAPPEAR_FRAME) hide the
    /// edited value.
    pub blink_counter: i32,
}

impl EditState {
    pub const IDLE: Self = Self {
        value_index: NO_EDITING,
        blink_counter: -1,
    };

    #[must_use]
    pub const fn is_editing(self) -> bool {
        self.value_index != NO_EDITING
    }
}

/// What a screen may touch while handling a call.
pub struct ScreenContext<'a, R> {
    pub engine: &'a mut TimeEngine<R>,
    pub settings: &'a mut Settings,
    pub scroll: &'a mut HorizontalScroll,
    pub buzzer: &'a mut dyn Buzzer,
    pub wifi_status: WifiStatus,
    /// The screen being called.
    pub self_id: ScreenId,
    requests: &'a mut Vec<UiRequest, MAX_REQUESTS>,
}

impl<'a, R: HardwareClock> ScreenContext<'a, R> {
    pub fn new(
        engine: &'a mut TimeEngine<R>,
        settings: &'a mut Settings,
        scroll: &'a mut HorizontalScroll,
        buzzer: &'a mut dyn Buzzer,
        wifi_status: WifiStatus,
        self_id: ScreenId,
        requests: &'a mut Vec<UiRequest, MAX_REQUESTS>,
    ) -> Self {
        Self {
            engine,
            settings,
            scroll,
            buzzer,
            wifi_status,
            self_id,
            requests,
        }
    }

    /// Queue a request for the orchestrator.
    pub fn request(&mut self, request: UiRequest) {
        if self.requests.push(request).is_err() {
            warn!("UI request queue full, dropping {:?}", request);
        }
    }

    #[must_use]
    pub fn values(&self) -> &SettingsValues {
        self.settings.get()
    }

    /// An hour as displayed under the current 12/24 h setting, plus whether it is morning.
    #[must_use]
    pub fn convert_hour(&self, hour: u8) -> (u8, bool) {
        convert_hour(hour, self.settings.get().format_24h)
    }

    /// Light AM or PM, or neither in 24 h format.
    pub fn put_am_pm_indicators(&self, frame: &mut Bitmap, morning: bool) {
        let twelve_hour = !self.settings.get().format_24h;
        frame.put_indicator(Indicator::Am, twelve_hour && morning);
        frame.put_indicator(Indicator::Pm, twelve_hour && !morning);
    }

    /// Light today's weekday LEDs.
    pub fn put_week_day(&self, frame: &mut Bitmap) {
        frame.put_week_day(self.engine.now().weekday, true);
    }

    /// Render one line of horizontally scrolling text; `edited` blinks while editing.
    pub fn render_scrolling_text(
        &mut self,
        frame: &mut Bitmap,
        full_refresh: bool,
        edit: EditState,
        left: &str,
        edited: &str,
        right: &str,
    ) {
        self.scroll
            .render(frame, full_refresh, edit.blink_counter, left, edited, right);
    }
}

/// The screen plugin interface.
///
/// All methods but [`render_frame`](Self::render_frame) have defaults for a screen that
/// shows something and edits nothing.
pub trait Screen<R: HardwareClock> {
    /// Draw this screen. Screens redraw only what changed unless `full_refresh` is set.
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    );

    /// Whether navigation should stop on this screen right now.
    fn is_available(&self, _ctx: &ScreenContext<'_, R>) -> bool {
        true
    }

    /// Time screens are where auto scroll returns to.
    fn is_time_function(&self) -> bool {
        false
    }

    /// The Set button. Starts editing, or moves on to the next value, by default.
    fn activate(&mut self, _edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        ctx.request(UiRequest::EditNextValue);
    }

    /// Number of editable values. Editing ends when the index passes it.
    fn value_count(&self, _settings: &SettingsValues) -> u8 {
        0
    }

    /// The screen was just selected.
    fn on_select(&mut self, _ctx: &mut ScreenContext<'_, R>) {}

    fn start_editing_value(&mut self, _value_index: u8, _ctx: &mut ScreenContext<'_, R>) {}

    fn modify_value(
        &mut self,
        _value_index: u8,
        _direction: Direction,
        _ctx: &mut ScreenContext<'_, R>,
    ) {
    }

    fn finish_editing(&mut self, _ctx: &mut ScreenContext<'_, R>) {}

    /// Whether the post-input brightness boost may apply while `value_index` is edited.
    fn allows_brightness_boost(&self, _value_index: u8) -> bool {
        true
    }

    /// Per-frame hook, called every frame whether the screen is shown or not.
    fn tick(&mut self, _ctx: &mut ScreenContext<'_, R>) {}
}

/// Every screen the clock has, as a closed set of variants.
#[derive(Clone, Debug)]
pub enum ScreenKind {
    Time(TimeScreen),
    Date(DateScreen),
    Temperature(TemperatureScreen),
    Submenu(SubmenuScreen),
    SkipNextAlarm(SkipNextAlarmScreen),
    Alarm(AlarmScreen),
    Countdown(CountdownScreen),
    Stopwatch(StopwatchScreen),
    Action(ActionScreen),
    WifiStatus(WifiStatusScreen),
    Options(OptionsScreen),
}

macro_rules! dispatch {
    ($self:expr, $screen:ident => $call:expr) => {
        match $self {
            ScreenKind::Time($screen) => $call,
            ScreenKind::Date($screen) => $call,
            ScreenKind::Temperature($screen) => $call,
            ScreenKind::Submenu($screen) => $call,
            ScreenKind::SkipNextAlarm($screen) => $call,
            ScreenKind::Alarm($screen) => $call,
            ScreenKind::Countdown($screen) => $call,
            ScreenKind::Stopwatch($screen) => $call,
            ScreenKind::Action($screen) => $call,
            ScreenKind::WifiStatus($screen) => $call,
            ScreenKind::Options($screen) => $call,
        }
    };
}

impl<R: HardwareClock> Screen<R> for ScreenKind {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        dispatch!(self, screen => {
            Screen::<R>::render_frame(screen, frame, edit, full_refresh, ctx)
        });
    }

    fn is_available(&self, ctx: &ScreenContext<'_, R>) -> bool {
        dispatch!(self, screen => Screen::<R>::is_available(screen, ctx))
    }

    fn is_time_function(&self) -> bool {
        dispatch!(self, screen => Screen::<R>::is_time_function(screen))
    }

    fn activate(&mut self, edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        dispatch!(self, screen => Screen::<R>::activate(screen, edit, ctx));
    }

    fn value_count(&self, settings: &SettingsValues) -> u8 {
        dispatch!(self, screen => Screen::<R>::value_count(screen, settings))
    }

    fn on_select(&mut self, ctx: &mut ScreenContext<'_, R>) {
        dispatch!(self, screen => Screen::<R>::on_select(screen, ctx));
    }

    fn start_editing_value(&mut self, value_index: u8, ctx: &mut ScreenContext<'_, R>) {
        dispatch!(self, screen => Screen::<R>::start_editing_value(screen, value_index, ctx));
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        dispatch!(self, screen => Screen::<R>::modify_value(screen, value_index, direction, ctx));
    }

    fn finish_editing(&mut self, ctx: &mut ScreenContext<'_, R>) {
        dispatch!(self, screen => Screen::<R>::finish_editing(screen, ctx));
    }

    fn allows_brightness_boost(&self, value_index: u8) -> bool {
        dispatch!(self, screen => Screen::<R>::allows_brightness_boost(screen, value_index))
    }

    fn tick(&mut self, ctx: &mut ScreenContext<'_, R>) {
        dispatch!(self, screen => Screen::<R>::tick(screen, ctx));
    }
}
