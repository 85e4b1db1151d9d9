use core::fmt::Write as _;

use heapless::String;
use time::Weekday;

use super::{EditState, NO_EDITING, Screen, ScreenContext, UiRequest};
use crate::{
    alarm::{AlarmConfig, AlarmId, AlarmMode},
    bitmap::Bitmap,
    field_editor::{Direction, FieldSpec, adjust_u8, cycle},
    rtc::HardwareClock,
    settings::SettingsValues,
    shared_constants::BLINK_DISAPPEAR_FRAME,
    ui_texts,
};

const EDITING_MODE: u8 = 1;
const EDITING_HOUR: u8 = 2;
const EDITING_MINUTE: u8 = 3;
const EDITING_WEEKDAYS: u8 = 4;

/// One alarm slot: `Al 1: 7:00` with its weekdays on the top row.
///
/// Editing goes through mode, hour, minute and weekdays; an alarm that is off only offers
/// its mode. While weekdays are edited, Up moves the cursor and Down toggles the day.
#[derive(Clone, Debug)]
pub struct AlarmScreen {
    id: AlarmId,
    edited_weekday: Weekday,
}

impl AlarmScreen {
    #[must_use]
    pub const fn new(id: AlarmId) -> Self {
        Self {
            id,
            edited_weekday: Weekday::Monday,
        }
    }

    #[must_use]
    pub const fn id(&self) -> AlarmId {
        self.id
    }

    /// Weekday under the cursor while weekdays are edited.
    #[must_use]
    pub const fn edited_weekday(&self) -> Weekday {
        self.edited_weekday
    }

    const fn prefix(&self) -> &'static str {
        match self.id {
            AlarmId::First => ui_texts::ALARM_1_COLON,
            AlarmId::Second => ui_texts::ALARM_2_COLON,
        }
    }
}

impl<R: HardwareClock> Screen<R> for AlarmScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let alarm = *ctx.values().alarm(self.id);
        let (hour, morning) = ctx.convert_hour(alarm.hour);
        let prefix = self.prefix();

        // While editing, pad single-digit hours so digits do not shift when changing.
        let mut hour_text = String::<4>::new();
        let mut minute_text = String::<4>::new();
        let padding = if hour < 10 && edit.is_editing() { " " } else { "" };
        if write!(hour_text, "{padding}{hour}").is_err()
            || write!(minute_text, "{:02}", alarm.minute).is_err()
        {
            return;
        }

        let mut text = String::<32>::new();
        match edit.value_index {
            NO_EDITING if alarm.mode == AlarmMode::Off => {
                ctx.render_scrolling_text(frame, full_refresh, edit, prefix, ui_texts::OFF, "");
            }
            EDITING_MODE => {
                let mode = ui_texts::alarm_mode(alarm.mode);
                ctx.render_scrolling_text(frame, full_refresh, edit, prefix, mode, "");
            }
            EDITING_HOUR => {
                let _ = write!(text, ":{minute_text}");
                ctx.render_scrolling_text(frame, full_refresh, edit, prefix, &hour_text, &text);
                ctx.put_am_pm_indicators(frame, morning);
            }
            EDITING_MINUTE => {
                let _ = write!(text, "{prefix}{hour_text}:");
                ctx.render_scrolling_text(frame, full_refresh, edit, &text, &minute_text, "");
                ctx.put_am_pm_indicators(frame, morning);
            }
            value_index => {
                if value_index == EDITING_WEEKDAYS {
                    // Stick to the right while days are toggled.
                    ctx.scroll.bring_to_right();
                }
                let _ = write!(text, "{prefix}{hour_text}:{minute_text}");
                ctx.render_scrolling_text(frame, full_refresh, edit, &text, "", "");
                ctx.put_am_pm_indicators(frame, morning);
            }
        }

        if alarm.is_on() {
            frame.put_week_days(alarm.weekdays);
        }
        if edit.value_index == EDITING_WEEKDAYS {
            let cursor_phase = edit.blink_counter < BLINK_DISAPPEAR_FRAME / 2;
            let on = cursor_phase != alarm.is_enabled_on(self.edited_weekday);
            frame.put_week_day(self.edited_weekday, on);
        }
    }

    fn value_count(&self, settings: &SettingsValues) -> u8 {
        if settings.alarm(self.id).is_on() {
            EDITING_WEEKDAYS
        } else {
            EDITING_MODE
        }
    }

    fn start_editing_value(&mut self, value_index: u8, ctx: &mut ScreenContext<'_, R>) {
        match value_index {
            EDITING_MODE | EDITING_HOUR | EDITING_MINUTE => {
                ctx.request(UiRequest::BringScrollingToRight);
            }
            EDITING_WEEKDAYS => self.edited_weekday = Weekday::Monday,
            _ => {}
        }
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        if value_index == EDITING_WEEKDAYS && direction.is_up() {
            self.edited_weekday = self.edited_weekday.next();
            return;
        }
        let weekday_bit = 1 << self.edited_weekday.number_days_from_sunday();
        let alarm = ctx.settings.modify().alarm_mut(self.id);
        match value_index {
            EDITING_MODE => alarm.mode = cycle(&AlarmMode::ALL, alarm.mode, direction),
            EDITING_HOUR => alarm.hour = adjust_u8(direction, FieldSpec::HOUR, alarm.hour),
            EDITING_MINUTE => alarm.minute = adjust_u8(direction, FieldSpec::MINUTE, alarm.minute),
            EDITING_WEEKDAYS => alarm.weekdays ^= weekday_bit,
            _ => {}
        }
    }

    fn finish_editing(&mut self, ctx: &mut ScreenContext<'_, R>) {
        let alarm: AlarmConfig = ctx.settings.get().alarm(self.id).normalized();
        if alarm != *ctx.settings.get().alarm(self.id) {
            info!("Alarm {} has no weekdays, turning it off", self.id.index() + 1);
            *ctx.settings.modify().alarm_mut(self.id) = alarm;
        }
        ctx.engine.set_alarm(self.id, alarm);
    }
}

/// "Skip next alarm: On/Off". Set toggles it; only shown while an alarm is on.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipNextAlarmScreen;

impl<R: HardwareClock> Screen<R> for SkipNextAlarmScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let state = ui_texts::on_off(ctx.values().skip_next_alarm);
        ctx.render_scrolling_text(
            frame,
            full_refresh,
            edit,
            ui_texts::SKIP_NEXT_ALARM_COLON,
            state,
            "",
        );
    }

    fn is_available(&self, ctx: &ScreenContext<'_, R>) -> bool {
        ctx.engine.is_alarm_on()
    }

    fn activate(&mut self, _edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        let settings = ctx.settings.modify();
        settings.skip_next_alarm = !settings.skip_next_alarm;
        ctx.request(UiRequest::BringScrollingToRight);
    }
}
