use core::fmt::Write as _;

use heapless::String;

use super::{EditState, Screen, ScreenContext, UiRequest};
use crate::{
    bitmap::{Bitmap, Font, Indicator},
    rtc::HardwareClock,
};

/// Hardware clock temperature as `NN.N°`, Celsius or Fahrenheit. Set toggles the unit.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemperatureScreen;

impl<R: HardwareClock> Screen<R> for TemperatureScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        _edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        if !full_refresh && ctx.engine.tick_count() != 0 {
            return;
        }
        let Some(celsius) = ctx.engine.temperature() else {
            return;
        };
        if celsius.is_nan() {
            return;
        }
        let use_celsius = ctx.values().use_celsius;
        let temperature = if use_celsius {
            celsius
        } else {
            celsius * 9.0 / 5.0 + 32.0
        };

        let mut digits = String::<8>::new();
        if write!(digits, "{:4.1}", temperature.abs().min(99.9)).is_err() {
            return;
        }

        frame.clear();
        if temperature < 0.0 {
            frame.draw_rectangle(0, 3, 1, 3, true);
        }
        // "dd.d": the integer part, a one-pixel point, then the tenths.
        let (integer, tenths) = digits.split_at(2);
        frame.draw_text(2, 0, Font::Classic, integer);
        frame.put_pixel(12, 6, true);
        frame.draw_text(14, 0, Font::Classic, tenths.trim_start_matches('.'));

        // Degree sign.
        for (x, y) in [(20, 0), (19, 1), (21, 1), (20, 2)] {
            frame.put_pixel(x, y, true);
        }
        let unit = if use_celsius {
            Indicator::Celsius
        } else {
            Indicator::Fahrenheit
        };
        frame.put_indicator(unit, true);
    }

    fn is_available(&self, ctx: &ScreenContext<'_, R>) -> bool {
        ctx.engine.has_hardware_clock()
    }

    fn activate(&mut self, _edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        let settings = ctx.settings.modify();
        settings.use_celsius = !settings.use_celsius;
        ctx.request(UiRequest::ForceRefresh);
    }
}
