use core::fmt::Write as _;

use heapless::String;

use super::{EditState, Screen, ScreenContext};
use crate::{
    bitmap::Bitmap,
    field_editor::{Direction, FieldSpec, adjust_field, cycle},
    rtc::HardwareClock,
    settings::{HourlyChime, SettingsValues},
    ui_texts,
};

const EDITING_AUTO_SCROLL: u8 = 1;
const EDITING_FORMAT: u8 = 2;
const EDITING_HOURLY_CHIME: u8 = 3;
const EDITING_AUTO_LIGHT: u8 = 4;
/// Manual brightness, or the darkness point when auto light is on.
const EDITING_BRIGHTNESS: u8 = 5;
const EDITING_BRIGHTNESS_DIM: u8 = 6;
const EDITING_BRIGHTNESS_BRIGHT: u8 = 7;

/// Every user option, edited one after the other behind a single "Options" entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionsScreen;

fn adjust_brightness(direction: Direction, spec: FieldSpec, value: i16) -> i16 {
    let adjusted = adjust_field(direction, spec, i32::from(value));
    i16::try_from(adjusted).unwrap_or(value)
}

impl<R: HardwareClock> Screen<R> for OptionsScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let values = *ctx.values();
        let mut percent = String::<8>::new();
        let (label, value): (&str, &str) = match edit.value_index {
            EDITING_AUTO_SCROLL => (
                ui_texts::AUTO_SCROLL_COLON,
                ui_texts::on_off(values.auto_scroll),
            ),
            EDITING_FORMAT => (
                ui_texts::TIME_FORMAT_COLON,
                if values.format_24h {
                    ui_texts::FORMAT_24H
                } else {
                    ui_texts::FORMAT_12H
                },
            ),
            EDITING_HOURLY_CHIME => (
                ui_texts::HOURLY_CHIME_COLON,
                ui_texts::hourly_chime(values.hourly_chime),
            ),
            EDITING_AUTO_LIGHT => (
                ui_texts::AUTO_LIGHT_COLON,
                ui_texts::on_off(values.auto_light),
            ),
            EDITING_BRIGHTNESS | EDITING_BRIGHTNESS_DIM | EDITING_BRIGHTNESS_BRIGHT => {
                let (label, brightness) = match edit.value_index {
                    EDITING_BRIGHTNESS if values.auto_light => {
                        (ui_texts::BRIGHTNESS_DARK_COLON, values.brightness_dark)
                    }
                    EDITING_BRIGHTNESS => (ui_texts::BRIGHTNESS_COLON, values.manual_brightness),
                    EDITING_BRIGHTNESS_DIM => {
                        (ui_texts::BRIGHTNESS_DIM_COLON, values.brightness_dim)
                    }
                    _ => (ui_texts::BRIGHTNESS_BRIGHT_COLON, values.brightness_bright),
                };
                let _ = write!(percent, "{brightness}%");
                (label, percent.as_str())
            }
            _ => (ui_texts::OPTIONS, ""),
        };
        ctx.render_scrolling_text(frame, full_refresh, edit, label, value, "");
    }

    fn value_count(&self, settings: &SettingsValues) -> u8 {
        if settings.auto_light {
            EDITING_BRIGHTNESS_BRIGHT
        } else {
            EDITING_BRIGHTNESS
        }
    }

    fn modify_value(
        &mut self,
        value_index: u8,
        direction: Direction,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let settings = ctx.settings.modify();
        match value_index {
            EDITING_AUTO_SCROLL => settings.auto_scroll = !settings.auto_scroll,
            EDITING_FORMAT => settings.format_24h = !settings.format_24h,
            EDITING_HOURLY_CHIME => {
                settings.hourly_chime = cycle(&HourlyChime::ALL, settings.hourly_chime, direction);
            }
            EDITING_AUTO_LIGHT => settings.auto_light = !settings.auto_light,
            EDITING_BRIGHTNESS if settings.auto_light => {
                settings.brightness_dark = adjust_brightness(
                    direction,
                    FieldSpec::BRIGHTNESS_POINT,
                    settings.brightness_dark,
                );
            }
            EDITING_BRIGHTNESS => {
                settings.manual_brightness = adjust_brightness(
                    direction,
                    FieldSpec::MANUAL_BRIGHTNESS,
                    settings.manual_brightness,
                );
            }
            EDITING_BRIGHTNESS_DIM => {
                settings.brightness_dim = adjust_brightness(
                    direction,
                    FieldSpec::BRIGHTNESS_POINT,
                    settings.brightness_dim,
                );
            }
            EDITING_BRIGHTNESS_BRIGHT => {
                settings.brightness_bright = adjust_brightness(
                    direction,
                    FieldSpec::BRIGHTNESS_POINT,
                    settings.brightness_bright,
                );
            }
            _ => {}
        }
    }

    /// The boost would hide the brightness being calibrated.
    fn allows_brightness_boost(&self, value_index: u8) -> bool {
        !matches!(
            value_index,
            EDITING_BRIGHTNESS | EDITING_BRIGHTNESS_DIM | EDITING_BRIGHTNESS_BRIGHT
        )
    }
}
