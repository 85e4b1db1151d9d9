//! The two scroll animations.
//!
//! [`HorizontalScroll`] pans a text line wider than the matrix back and forth, pausing at
//! both ends. [`VerticalScroll`] slides one screen out and the next one in when navigating
//! the menu.

use crate::{
    bitmap::{Bitmap, Font, text_width},
    cyclic_counter::CyclicCounter,
    shared_constants::{
        BLINK_DISAPPEAR_FRAME, MATRIX_HEIGHT, MATRIX_WIDTH, SCROLL_FRAME_DIVIDER,
        SCROLL_PAUSE_FRAMES, VERTICAL_SCROLL_FRAME_DIVIDER,
    },
};

/// Font of all scrolling text.
pub const SCROLL_FONT: Font = Font::Narrow;

/// Phase of the horizontal text scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HorizontalPhase {
    LeftPause,
    MovingRight,
    RightPause,
    MovingLeft,
    /// An edited value just changed: show it on the next render, then pause.
    RightPauseAfterChange,
}

/// Text scroll of the active screen. Re-initialized whenever the screen changes.
#[derive(Clone, Debug)]
pub struct HorizontalScroll {
    phase: HorizontalPhase,
    offset: i32,
    pause_frames: u16,
    frame_divider: CyclicCounter,
}

impl HorizontalScroll {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: HorizontalPhase::LeftPause,
            offset: 0,
            pause_frames: 0,
            frame_divider: CyclicCounter::new(SCROLL_FRAME_DIVIDER),
        }
    }

    /// Back to the start of the text, pausing before moving.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Make the edited value visible on the next render.
    pub const fn bring_to_right(&mut self) {
        self.phase = HorizontalPhase::RightPauseAfterChange;
    }

    #[must_use]
    pub const fn phase(&self) -> HorizontalPhase {
        self.phase
    }

    /// Pixels the text is currently shifted left.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Render `left`, `edited` and `right` as one scrolling line, then advance one frame.
    ///
    /// `edited` is hidden during the off half of the blink phase. The frame is only
    /// redrawn when something visible changed, unless `full_refresh` is set.
    pub fn render(
        &mut self,
        frame: &mut Bitmap,
        full_refresh: bool,
        blink_counter: i32,
        left: &str,
        edited: &str,
        right: &str,
    ) {
        let left_advance = advance_width(left);
        let edited_advance = advance_width(edited);
        let line_width = left_advance + edited_advance + advance_width(right) - 1;

        if self.phase == HorizontalPhase::RightPauseAfterChange {
            if text_width(SCROLL_FONT, edited) <= MATRIX_WIDTH {
                self.offset = self.offset.max(line_width - MATRIX_WIDTH);
                self.phase = HorizontalPhase::RightPause;
            } else {
                // Too wide to show whole: start at the value and scroll over it.
                self.offset = left_advance;
                self.phase = HorizontalPhase::LeftPause;
            }
            self.frame_divider.set(0);
            self.pause_frames = 0;
        }
        self.offset = self.offset.clamp(0, max_offset(line_width));

        let moving = matches!(
            self.phase,
            HorizontalPhase::MovingRight | HorizontalPhase::MovingLeft
        );
        if full_refresh
            || (moving && self.frame_divider.value() == 0)
            || self.pause_frames == 0
            || blink_counter == 0
            || blink_counter == BLINK_DISAPPEAR_FRAME
        {
            if full_refresh {
                frame.clear();
            } else {
                // Leave the border LEDs alone.
                frame.draw_rectangle(0, 0, MATRIX_WIDTH, MATRIX_HEIGHT, false);
            }

            let x = -self.offset;
            frame.draw_text(x, 0, SCROLL_FONT, left);
            if edited.is_empty() || blink_counter < BLINK_DISAPPEAR_FRAME {
                frame.draw_text(x + left_advance, 0, SCROLL_FONT, edited);
            }
            frame.draw_text(x + left_advance + edited_advance, 0, SCROLL_FONT, right);

            // Text scrolled past the left edge would spill into the indicator columns.
            frame.draw_rectangle(-2, 0, -1, MATRIX_HEIGHT - 1, false);
        }

        self.advance(line_width);
    }

    fn advance(&mut self, line_width: i32) {
        match self.phase {
            HorizontalPhase::LeftPause => {
                self.pause_frames = self.pause_frames.saturating_add(1);
                if self.pause_frames >= SCROLL_PAUSE_FRAMES {
                    self.phase = HorizontalPhase::MovingRight;
                }
            }
            HorizontalPhase::MovingRight => {
                if self.frame_divider.increment() {
                    if self.offset < max_offset(line_width) {
                        self.offset += 1;
                    } else {
                        self.phase = HorizontalPhase::RightPause;
                        self.pause_frames = 0;
                    }
                }
            }
            HorizontalPhase::RightPause => {
                self.pause_frames = self.pause_frames.saturating_add(1);
                if self.pause_frames >= SCROLL_PAUSE_FRAMES {
                    self.phase = HorizontalPhase::MovingLeft;
                }
            }
            HorizontalPhase::MovingLeft => {
                if self.frame_divider.increment() {
                    if self.offset > 0 {
                        self.offset -= 1;
                    } else {
                        self.phase = HorizontalPhase::LeftPause;
                        self.pause_frames = 0;
                    }
                }
            }
            HorizontalPhase::RightPauseAfterChange => {}
        }
    }
}

impl Default for HorizontalScroll {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest offset that still fills the matrix with text.
#[must_use]
pub const fn max_offset(text_width: i32) -> i32 {
    let max = text_width - MATRIX_WIDTH;
    if max > 0 { max } else { 0 }
}

fn advance_width(text: &str) -> i32 {
    let count = i32::try_from(text.chars().count()).unwrap_or(0);
    count * SCROLL_FONT.advance()
}

/// Which way the menu slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slide {
    /// Previous entry: content moves down, the new screen enters from the top.
    FromTop,
    /// Next entry: content moves up, the new screen enters from the bottom.
    FromBottom,
}

impl Slide {
    const fn step(self) -> i32 {
        match self {
            Self::FromTop => 1,
            Self::FromBottom => -1,
        }
    }
}

/// Menu transition between two screens.
///
/// `offset` counts rows of the new screen already visible, signed by direction. Reaching
/// one more than the matrix height ends the transition.
#[derive(Clone, Debug)]
pub struct VerticalScroll {
    direction: i32,
    offset: i32,
    frame_divider: CyclicCounter,
}

impl VerticalScroll {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            direction: 0,
            offset: 0,
            frame_divider: CyclicCounter::new(VERTICAL_SCROLL_FRAME_DIVIDER),
        }
    }

    /// Start (or redirect) a transition.
    ///
    /// Reversing mid-flight shifts the offset by a full screen plus the blank separator
    /// row, so the slide continues from where it is instead of jumping.
    pub const fn start(&mut self, slide: Slide) {
        let step = slide.step();
        if self.direction < 0 && step > 0 {
            self.offset += MATRIX_HEIGHT + 1;
        } else if self.direction > 0 && step < 0 {
            self.offset -= MATRIX_HEIGHT + 1;
        }
        self.direction = step;
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.direction != 0
    }

    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// -1, 0 or +1.
    #[must_use]
    pub const fn direction(&self) -> i32 {
        self.direction
    }

    /// Whether this frame moved the slide and needs a compose.
    #[must_use]
    pub const fn is_compose_frame(&self) -> bool {
        self.frame_divider.value() == 0
    }

    /// Advance one frame. Returns `true` on the frame the transition completes.
    pub const fn advance(&mut self) -> bool {
        if self.direction == 0 || !self.frame_divider.increment() {
            return false;
        }
        self.offset += self.direction;
        if self.offset > MATRIX_HEIGHT || self.offset < -MATRIX_HEIGHT {
            self.offset = 0;
            self.direction = 0;
            return true;
        }
        false
    }

    /// Shift the outgoing frame one row and copy in the visible part of `incoming`.
    pub fn compose(&self, frame: &mut Bitmap, incoming: &Bitmap) {
        let right = MATRIX_WIDTH - 1;
        let offset = self.offset;
        if offset > 0 {
            frame.move_rectangle(0, offset - 1, right, MATRIX_HEIGHT - 2, 1);
            frame.draw_rectangle(0, offset - 1, right, offset - 1, false);
            incoming.copy_rectangle(
                0,
                MATRIX_HEIGHT - offset + 1,
                right,
                MATRIX_HEIGHT - 1,
                frame,
                0,
            );
        } else if offset < 0 {
            frame.move_rectangle(0, 1, right, MATRIX_HEIGHT + offset, -1);
            frame.draw_rectangle(0, MATRIX_HEIGHT + offset, right, MATRIX_HEIGHT + offset, false);
            incoming.copy_rectangle(0, 0, right, -offset - 2, frame, MATRIX_HEIGHT + 1 + offset);
        }
    }
}

impl Default for VerticalScroll {
    fn default() -> Self {
        Self::new()
    }
}
