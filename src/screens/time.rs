use super::{EditState, Screen, ScreenContext, UiRequest};
use crate::{
    bitmap::{Bitmap, Font},
    field_editor::{Direction, FieldSpec, adjust_u8},
    rtc::HardwareClock,
    settings::SettingsValues,
    shared_constants::{BLINK_DISAPPEAR_FRAME, FRAME_RATE},
};

const EDITING_HOUR: u8 = 1;
const EDITING_MINUTE: u8 = 2;
const HALF_SECOND: i32 = FRAME_RATE as i32 / 2;

/// Layout of a time screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeStyle {
    /// `H:MM:SS` in the narrow font.
    HourMinSec,
    /// `HH:MM` in the narrow font over a bar that fills up every minute.
    HourMinBar,
    /// `HH:MM` in the classic font with blinking middle dots.
    HourMin,
}

/// The current time. Editing sets hours then minutes.
#[derive(Clone, Debug)]
pub struct TimeScreen {
    style: TimeStyle,
}

impl TimeScreen {
    #[must_use]
    pub const fn new(style: TimeStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub const fn style(&self) -> TimeStyle {
        self.style
    }

    fn put_am_pm_and_convert_hour<R: HardwareClock>(
        frame: &mut Bitmap,
        ctx: &ScreenContext<'_, R>,
    ) -> u8 {
        let (hour, morning) = ctx.convert_hour(ctx.engine.now().hour);
        ctx.put_am_pm_indicators(frame, morning);
        hour
    }

    fn render_hour_min_sec<R: HardwareClock>(
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &ScreenContext<'_, R>,
    ) {
        let tick = ctx.engine.tick_count();
        let blink = edit.blink_counter;
        if tick == 0 || (edit.is_editing() && blink == 0) || full_refresh {
            frame.clear();
            let hour = Self::put_am_pm_and_convert_hour(frame, ctx);
            if hour >= 10 {
                frame.draw_digit(0, 0, Font::Narrow, hour / 10);
            }
            frame.draw_digit(3, 0, Font::Narrow, hour % 10);
            let now = ctx.engine.now();
            frame.draw_two_digits(7, 0, Font::Narrow, now.minute, true);
            frame.draw_two_digits(15, 0, Font::Narrow, now.second, true);
            ctx.put_week_day(frame);
        }

        if blink == BLINK_DISAPPEAR_FRAME || (tick == 0 && blink >= BLINK_DISAPPEAR_FRAME) {
            match edit.value_index {
                EDITING_HOUR => frame.draw_rectangle(0, 0, 6, 7, false),
                EDITING_MINUTE => frame.draw_rectangle(7, 0, 13, 7, false),
                _ => {}
            }
        }

        if tick == HALF_SECOND
            || (edit.is_editing() && blink == 0 && tick >= HALF_SECOND)
            || full_refresh
        {
            for (x, y) in [(6, 2), (6, 4), (14, 2), (14, 4)] {
                frame.put_pixel(x, y, true);
            }
        }
    }

    fn render_hour_min_bar<R: HardwareClock>(
        frame: &mut Bitmap,
        edit: EditState,
        mut full_refresh: bool,
        ctx: &ScreenContext<'_, R>,
    ) {
        let now = *ctx.engine.now();
        let tick = ctx.engine.tick_count();
        let bar_width = i32::from(now.second / 3);

        if (now.second == 0 && tick == 0)
            || (edit.is_editing() && edit.blink_counter == 0)
            || full_refresh
        {
            frame.clear();
            full_refresh = true;
            let hour = Self::put_am_pm_and_convert_hour(frame, ctx);
            frame.draw_two_digits(0, 0, Font::Narrow, hour, false);
            frame.draw_two_digits(12, 0, Font::Narrow, now.minute, true);
            frame.put_pixel(10, 1, true);
            frame.put_pixel(10, 3, true);
            frame.draw_rectangle(0, 6, bar_width - 1, 6, true);
        }

        if edit.blink_counter == BLINK_DISAPPEAR_FRAME {
            match edit.value_index {
                EDITING_HOUR => frame.draw_rectangle(0, 0, 8, 5, false),
                EDITING_MINUTE => frame.draw_rectangle(12, 0, 20, 5, false),
                _ => {}
            }
        }

        if tick == 0 || full_refresh {
            // A pixel slides in from the right and lands on the bar every third second.
            match now.second % 3 {
                0 => {
                    if bar_width != 0 {
                        frame.put_pixel(bar_width - 1, 6, true);
                    }
                    frame.put_pixel(bar_width, 6, false);
                }
                1 => frame.put_pixel(bar_width + 2, 6, true),
                _ => {
                    frame.put_pixel(bar_width + 1, 6, true);
                    frame.put_pixel(bar_width + 2, 6, false);
                }
            }
            ctx.put_week_day(frame);
        }
    }

    fn render_hour_min<R: HardwareClock>(
        frame: &mut Bitmap,
        edit: EditState,
        mut full_refresh: bool,
        ctx: &ScreenContext<'_, R>,
    ) {
        let blink = edit.blink_counter;
        if edit.is_editing() && (blink == 0 || blink == BLINK_DISAPPEAR_FRAME) {
            full_refresh = true;
        }
        let now = *ctx.engine.now();
        let tick = ctx.engine.tick_count();

        if full_refresh || (now.second == 0 && tick == 0) {
            frame.clear();
            let hour = Self::put_am_pm_and_convert_hour(frame, ctx);
            if edit.value_index != EDITING_HOUR || blink < BLINK_DISAPPEAR_FRAME {
                frame.draw_two_digits(0, 0, Font::Classic, hour, false);
            }
            if edit.value_index != EDITING_MINUTE || blink < BLINK_DISAPPEAR_FRAME {
                frame.draw_two_digits(13, 0, Font::Classic, now.minute, true);
            }
        }

        if full_refresh || tick == 0 {
            frame.draw_middle_dots(now.second % 2 != 0);
            ctx.put_week_day(frame);
        }
    }
}

impl<R: HardwareClock> Screen<R> for TimeScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        match self.style {
            TimeStyle::HourMinSec => Self::render_hour_min_sec(frame, edit, full_refresh, ctx),
            TimeStyle::HourMinBar => Self::render_hour_min_bar(frame, edit, full_refresh, ctx),
            TimeStyle::HourMin => Self::render_hour_min(frame, edit, full_refresh, ctx),
        }
    }

    fn is_time_function(&self) -> bool {
        true
    }

    fn value_count(&self, _settings: &SettingsValues) -> u8 {
        EDITING_MINUTE
    }

    fn start_editing_value(&mut self, value_index: u8, ctx: &mut ScreenContext<'_, R>) {
        if value_index == EDITING_HOUR {
            // Start hidden, so the press visibly did something.
            ctx.request(UiRequest::SetBlinkCounter(BLINK_DISAPPEAR_FRAME));
        }
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let mut time = *ctx.engine.now();
        match value_index {
            EDITING_HOUR => time.hour = adjust_u8(direction, FieldSpec::HOUR, time.hour),
            EDITING_MINUTE => {
                time.minute = adjust_u8(direction, FieldSpec::MINUTE, time.minute);
                // Lets the user start the minute exactly on another clock's tick.
                time.second = 0;
                ctx.engine.reset_ticks();
            }
            _ => return,
        }
        ctx.engine.set(&time);
    }

    fn finish_editing(&mut self, ctx: &mut ScreenContext<'_, R>) {
        ctx.engine.start_sync_to_hardware_clock();
    }
}
