use core::fmt::Write as _;

use heapless::String;

use super::{EditState, Screen, ScreenContext, UiRequest};
use crate::{
    bitmap::{Bitmap, Font},
    broken_down_time::days_in_month,
    field_editor::{Direction, FieldSpec, adjust_field, adjust_u8},
    rtc::HardwareClock,
    settings::SettingsValues,
    shared_constants::BLINK_DISAPPEAR_FRAME,
};

const EDITING_YEAR: u8 = 1;
const EDITING_MONTH: u8 = 2;
const EDITING_DAY: u8 = 3;

/// Day and month (`DD-MM`), or the year while it is being edited.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateScreen;

impl<R: HardwareClock> Screen<R> for DateScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let now = *ctx.engine.now();
        let blink = edit.blink_counter;
        let midnight =
            ctx.engine.tick_count() == 0 && now.hour == 0 && now.minute == 0 && now.second == 0;
        if !(full_refresh || midnight || blink == 0 || blink == BLINK_DISAPPEAR_FRAME) {
            return;
        }

        frame.clear();
        let visible = |index: u8| edit.value_index != index || blink < BLINK_DISAPPEAR_FRAME;
        if edit.value_index == EDITING_YEAR {
            if visible(EDITING_YEAR) {
                let mut year = String::<8>::new();
                if write!(year, "{}", now.year).is_ok() {
                    frame.draw_text(1, 0, Font::Classic, &year);
                }
            }
        } else {
            if visible(EDITING_DAY) {
                frame.draw_two_digits(0, 0, Font::Classic, now.day, true);
            }
            frame.draw_rectangle(10, 3, 11, 3, true);
            if visible(EDITING_MONTH) {
                frame.draw_two_digits(13, 0, Font::Classic, now.month, true);
            }
        }
        ctx.put_week_day(frame);
    }

    fn value_count(&self, _settings: &SettingsValues) -> u8 {
        EDITING_DAY
    }

    fn start_editing_value(&mut self, value_index: u8, ctx: &mut ScreenContext<'_, R>) {
        if matches!(value_index, EDITING_YEAR | EDITING_MONTH) {
            // The layout just switched between year and day-month: start visible.
            ctx.request(UiRequest::SetBlinkCounter(0));
        }
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let mut date = *ctx.engine.now();
        match value_index {
            EDITING_YEAR => date.year = adjust_field(direction, FieldSpec::YEAR, date.year),
            EDITING_MONTH => date.month = adjust_u8(direction, FieldSpec::MONTH, date.month),
            EDITING_DAY => {
                let days = days_in_month(date.year, date.month);
                date.day = adjust_u8(direction, FieldSpec::day(days), date.day);
            }
            _ => return,
        }
        ctx.engine.set(&date);
    }

    fn finish_editing(&mut self, ctx: &mut ScreenContext<'_, R>) {
        ctx.engine.start_sync_to_hardware_clock();
    }
}
