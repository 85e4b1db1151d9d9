//! The 24x8 one-bit frame buffer.
//!
//! Row `y` is one `u32`, column 0 in the most significant bit. Columns 0-1 hold the status
//! indicators, row 0 the weekday LEDs; the remaining 22x7 "matrix" is where screens draw.
//! Drawing coordinates are relative to a draw origin, the matrix corner by default, so
//! screens never have to know about the border.
//!
//! Text uses `embedded-graphics` mono fonts through the [`DrawTarget`] implementation.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        iso_8859_1::{FONT_4X6, FONT_5X7},
    },
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Point, Size},
    text::{Baseline, Text},
    Drawable, Pixel,
};
use time::Weekday;

use crate::shared_constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MATRIX_HEIGHT, MATRIX_LEFT, MATRIX_TOP, MATRIX_WIDTH,
};

const ROWS: usize = DISPLAY_HEIGHT as usize;
const LEFT_LED: u32 = 1 << 31;
const RIGHT_LED: u32 = 1 << 30;

/// Status LEDs in the two leftmost columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Auto scroll ("move on") enabled.
    MoveOn,
    AlarmOn,
    CountDown,
    Fahrenheit,
    Celsius,
    Am,
    Pm,
    CountUp,
    Hourly,
    AutoLight,
}

impl Indicator {
    /// Row and column mask of the LED(s) for this indicator.
    #[must_use]
    pub const fn location(self) -> (usize, u32) {
        match self {
            Self::MoveOn => (0, LEFT_LED | RIGHT_LED),
            Self::AlarmOn => (1, LEFT_LED | RIGHT_LED),
            Self::CountDown => (2, LEFT_LED | RIGHT_LED),
            Self::Fahrenheit => (3, LEFT_LED),
            Self::Celsius => (3, RIGHT_LED),
            Self::Am => (4, LEFT_LED),
            Self::Pm => (4, RIGHT_LED),
            Self::CountUp => (5, LEFT_LED | RIGHT_LED),
            Self::Hourly => (6, LEFT_LED | RIGHT_LED),
            Self::AutoLight => (7, LEFT_LED | RIGHT_LED),
        }
    }
}

/// Fonts available to screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// 4 px cells, 6 rows. Fits `H:MM:SS` on the matrix.
    Narrow,
    /// 5 px cells, 7 rows. Fits `HH:MM`.
    Classic,
}

impl Font {
    #[must_use]
    pub const fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Narrow => &FONT_4X6,
            Self::Classic => &FONT_5X7,
        }
    }

    /// Horizontal advance of one character, spacing included.
    #[must_use]
    pub const fn advance(self) -> i32 {
        let font = self.mono_font();
        (font.character_size.width + font.character_spacing) as i32
    }
}

/// Width in pixels of `text`, not counting the blank column after the last character.
#[must_use]
pub fn text_width(font: Font, text: &str) -> i32 {
    let count = i32::try_from(text.chars().count()).unwrap_or(i32::MAX / 8);
    if count == 0 {
        0
    } else {
        count * font.advance() - 1
    }
}

/// Mask of columns `left..=right` (absolute), empty if the span is off-screen.
fn row_mask(left: i32, right: i32) -> u32 {
    if right < left || right < 0 || left > 31 {
        return 0;
    }
    let left = left.max(0).unsigned_abs();
    let right = right.min(31).unsigned_abs();
    (u32::MAX >> left) & (u32::MAX << (31 - right))
}

/// One display frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    rows: [u32; ROWS],
    origin: Point,
}

impl Bitmap {
    /// A blank frame drawing relative to the matrix corner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [0; ROWS],
            origin: Point::new(MATRIX_LEFT, MATRIX_TOP),
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; ROWS];
    }

    #[must_use]
    pub const fn rows(&self) -> &[u32; ROWS] {
        &self.rows
    }

    pub const fn set_draw_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Pixel at absolute coordinates; off-screen reads as off.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if !(0..DISPLAY_WIDTH).contains(&x) {
            return false;
        }
        let Ok(y) = usize::try_from(y) else {
            return false;
        };
        self.rows
            .get(y)
            .is_some_and(|row| row & (1 << (31 - x.unsigned_abs())) != 0)
    }

    /// Set one pixel relative to the draw origin. Off-screen writes are dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (x, y) = (x + self.origin.x, y + self.origin.y);
        if !(0..DISPLAY_WIDTH).contains(&x) {
            return;
        }
        let mask = 1 << (31 - x.unsigned_abs());
        self.update_row(y, mask, on);
    }

    /// Fill (or clear) the inclusive rectangle, relative to the draw origin.
    pub fn draw_rectangle(&mut self, left: i32, top: i32, right: i32, bottom: i32, on: bool) {
        let mask = row_mask(left + self.origin.x, right + self.origin.x);
        for y in (top + self.origin.y)..=(bottom + self.origin.y) {
            self.update_row(y, mask, on);
        }
    }

    /// Shift the rectangle's rows vertically by `shift` within this bitmap.
    pub fn move_rectangle(&mut self, left: i32, top: i32, right: i32, bottom: i32, shift: i32) {
        let mask = row_mask(left + self.origin.x, right + self.origin.x);
        let (top, bottom) = (top + self.origin.y, bottom + self.origin.y);
        let mut copy_row = |y: i32| {
            let source = self.row(y) & mask;
            let target = y + shift;
            self.update_row(target, mask, false);
            self.update_row(target, source, true);
        };
        if shift > 0 {
            (top..=bottom).rev().for_each(&mut copy_row);
        } else if shift < 0 {
            (top..=bottom).for_each(&mut copy_row);
        }
    }

    /// Copy rows `top..=bottom` of the rectangle into `dest`, starting at row `dest_top`.
    /// All rows are relative to each bitmap's draw origin.
    pub fn copy_rectangle(
        &self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        dest: &mut Self,
        dest_top: i32,
    ) {
        let mask = row_mask(left + self.origin.x, right + self.origin.x);
        let mut target = dest_top + dest.origin.y;
        for y in (top + self.origin.y)..=(bottom + self.origin.y) {
            let source = self.row(y) & mask;
            dest.update_row(target, mask, false);
            dest.update_row(target, source, true);
            target += 1;
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Returns the text width.
    pub fn draw_text(&mut self, x: i32, y: i32, font: Font, text: &str) -> i32 {
        let style = MonoTextStyle::new(font.mono_font(), BinaryColor::On);
        let Ok(_) = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
        text_width(font, text)
    }

    /// Draw a two digit number, the tens digit omitted below 10 unless `leading_zero`.
    pub fn draw_two_digits(&mut self, x: i32, y: i32, font: Font, value: u8, leading_zero: bool) {
        let tens = value / 10 % 10;
        if tens != 0 || leading_zero {
            self.draw_digit(x, y, font, tens);
        }
        self.draw_digit(x + font.advance(), y, font, value % 10);
    }

    pub fn draw_digit(&mut self, x: i32, y: i32, font: Font, digit: u8) {
        let glyph = [b'0' + digit % 10];
        if let Ok(text) = core::str::from_utf8(&glyph) {
            self.draw_text(x, y, font, text);
        }
    }

    pub fn put_indicator(&mut self, indicator: Indicator, on: bool) {
        let (row, mask) = indicator.location();
        if let Some(bits) = self.rows.get_mut(row) {
            if on {
                *bits |= mask;
            } else {
                *bits &= !mask;
            }
        }
    }

    /// Light (or clear) the LED pair of one weekday. The row starts with Monday.
    pub fn put_week_day(&mut self, weekday: Weekday, on: bool) {
        let x = 3 + i32::from(weekday.number_days_from_monday()) * 3;
        self.update_row(0, row_mask(x, x + 1), on);
    }

    /// Show an alarm weekday mask (Sunday is bit 0).
    pub fn put_week_days(&mut self, weekday_bits: u8) {
        let mut day = Weekday::Monday;
        for _ in 0..7 {
            let bit = 1 << day.number_days_from_sunday();
            self.put_week_day(day, weekday_bits & bit != 0);
            day = day.next();
        }
    }

    /// The two colon blocks between hours and minutes in the classic layout.
    pub fn draw_middle_dots(&mut self, on: bool) {
        self.draw_rectangle(10, 1, 11, 2, on);
        self.draw_rectangle(10, 4, 11, 5, on);
    }

    fn row(&self, y: i32) -> u32 {
        usize::try_from(y)
            .ok()
            .and_then(|y| self.rows.get(y))
            .copied()
            .unwrap_or(0)
    }

    fn update_row(&mut self, y: i32, mask: u32, on: bool) {
        let Some(bits) = usize::try_from(y).ok().and_then(|y| self.rows.get_mut(y)) else {
            return;
        };
        if on {
            *bits |= mask;
        } else {
            *bits &= !mask;
        }
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(MATRIX_WIDTH.unsigned_abs(), MATRIX_HEIGHT.unsigned_abs())
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
