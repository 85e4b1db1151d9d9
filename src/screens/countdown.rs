use super::{EditState, MenuId, Screen, ScreenContext, UiRequest};
use crate::{
    bitmap::{Bitmap, Font, Indicator},
    cyclic_counter::CyclicCounter,
    field_editor::{Direction, FieldSpec, adjust_u8},
    rtc::HardwareClock,
    settings::SettingsValues,
    shared_constants::{
        BLINK_DISAPPEAR_FRAME, COUNTDOWN_BEEP_MS, FRAME_RATE, STOP_RINGING_AFTER_SECS,
    },
};

const EDITING_MINUTE: u8 = 1;
const EDITING_SECOND: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountdownState {
    Stopped,
    Running,
    Ringing,
}

/// A minute:second countdown. Set starts and stops it; the start value is edited through
/// the "Set" entry of its submenu.
#[derive(Clone, Debug)]
pub struct CountdownScreen {
    parent: MenuId,
    state: CountdownState,
    minute: u8,
    second: u8,
    tick: CyclicCounter,
    ringing_counter: CyclicCounter,
    ringing_for_secs: u32,
}

impl CountdownScreen {
    /// A stopped countdown living in `parent`, the menu it brings forward when it rings.
    #[must_use]
    pub const fn new(parent: MenuId) -> Self {
        Self {
            parent,
            state: CountdownState::Stopped,
            minute: 0,
            second: 0,
            tick: CyclicCounter::new(FRAME_RATE),
            ringing_counter: CyclicCounter::new(FRAME_RATE),
            ringing_for_secs: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CountdownState {
        self.state
    }

    /// Remaining `(minutes, seconds)`.
    #[must_use]
    pub const fn remaining(&self) -> (u8, u8) {
        (self.minute, self.second)
    }

    /// Load the configured start value.
    pub fn reload(&mut self, settings: &SettingsValues) {
        self.minute = settings.countdown_start_minute;
        self.second = settings.countdown_start_second;
        self.tick.set(0);
    }

    /// Stop and rewind, ready for the start value to be edited.
    pub fn set(&mut self, settings: &SettingsValues) {
        self.state = CountdownState::Stopped;
        self.reload(settings);
    }

    /// Silence a ringing countdown. Returns whether it was ringing.
    pub fn stop_ringing(&mut self) -> bool {
        if self.state == CountdownState::Ringing {
            self.state = CountdownState::Stopped;
            true
        } else {
            false
        }
    }

    /// Count one second down. The tick counts up so a full second passes before the
    /// display first changes.
    fn count_down(&mut self) {
        if !self.tick.increment() {
            return;
        }
        if self.second == 0 {
            self.second = 59;
            self.minute = self.minute.saturating_sub(1);
        } else {
            self.second -= 1;
        }
    }
}

impl<R: HardwareClock> Screen<R> for CountdownScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        mut full_refresh: bool,
        _ctx: &mut ScreenContext<'_, R>,
    ) {
        let blink = edit.blink_counter;
        if edit.is_editing() && (blink == 0 || blink == BLINK_DISAPPEAR_FRAME) {
            full_refresh = true;
        }
        if !full_refresh && self.state != CountdownState::Running {
            return;
        }

        frame.clear();
        if edit.value_index != EDITING_MINUTE || blink < BLINK_DISAPPEAR_FRAME {
            frame.draw_two_digits(0, 0, Font::Classic, self.minute, true);
        }
        if edit.value_index != EDITING_SECOND || blink < BLINK_DISAPPEAR_FRAME {
            frame.draw_two_digits(13, 0, Font::Classic, self.second, true);
        }
        let tick = self.tick.value();
        if tick == 0 || tick > i32::from(FRAME_RATE / 2) {
            frame.draw_middle_dots(true);
        }
        frame.put_indicator(Indicator::CountDown, true);
    }

    fn activate(&mut self, edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        if edit.is_editing() {
            ctx.request(UiRequest::EditNextValue);
            return;
        }
        self.state = match self.state {
            CountdownState::Stopped => CountdownState::Running,
            CountdownState::Running => CountdownState::Stopped,
            CountdownState::Ringing => CountdownState::Ringing,
        };
        debug!("Countdown {:?}", self.state);
    }

    fn value_count(&self, _settings: &SettingsValues) -> u8 {
        EDITING_SECOND
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let settings = ctx.settings.modify();
        match value_index {
            EDITING_MINUTE => {
                settings.countdown_start_minute =
                    adjust_u8(direction, FieldSpec::MINUTE, settings.countdown_start_minute);
            }
            EDITING_SECOND => {
                settings.countdown_start_second =
                    adjust_u8(direction, FieldSpec::SECOND, settings.countdown_start_second);
            }
            _ => return,
        }

        // 00:00 would ring immediately: step over it in the direction of travel.
        if settings.countdown_start_minute == 0 && settings.countdown_start_second == 0 {
            settings.countdown_start_second =
                if value_index == EDITING_MINUTE || direction.is_up() { 1 } else { 59 };
        }
        let values = *settings;
        self.reload(&values);
    }

    fn tick(&mut self, ctx: &mut ScreenContext<'_, R>) {
        if self.state == CountdownState::Running {
            self.count_down();
            if self.minute == 0 && self.second == 0 {
                info!("Countdown finished");
                self.state = CountdownState::Ringing;
                self.ringing_counter.set(0);
                self.ringing_for_secs = 0;
                let values = *ctx.values();
                self.reload(&values);
                ctx.request(UiRequest::ForceRefresh);
                // Come forward even if the user navigated away.
                ctx.request(UiRequest::EnterMenu {
                    menu: self.parent,
                    select: Some(ctx.self_id),
                });
            }
        }

        if self.state == CountdownState::Ringing {
            let counter = self.ringing_counter.value();
            if counter == 0 || counter == i32::from(FRAME_RATE / 4) {
                ctx.buzzer.beep_for_ms(COUNTDOWN_BEEP_MS);
            }
            if counter == 0 {
                self.ringing_for_secs += 1;
                if self.ringing_for_secs >= STOP_RINGING_AFTER_SECS {
                    info!("Countdown stopped ringing");
                    self.state = CountdownState::Stopped;
                }
            }
            self.ringing_counter.increment();
        }
    }
}
