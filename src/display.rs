//! The LED matrix seen from the UI: a frame buffer, an ambient light sensor and a
//! brightness control.

use crate::{bitmap::Bitmap, moving_average::MovingAverage};

/// A 24x8 LED display with a light sensor.
pub trait Display {
    /// The frame buffer. Whatever it holds after a UI tick is what the display shows.
    fn frame(&mut self) -> &mut Bitmap;

    /// Ambient light in percent (0 = dark, 100 = full daylight).
    fn ambient_light(&mut self) -> f32;

    /// Brightness in percent. Values below 0 dim past the minimum duty cycle, where the
    /// hardware supports it.
    fn set_brightness(&mut self, percent: f32);
}

/// An in-memory display for host builds and tests.
///
/// Ambient light samples are smoothed the way a photo-resistor reading would be.
#[derive(Clone, Debug)]
pub struct VirtualDisplay {
    frame: Bitmap,
    ambient: MovingAverage<16>,
    brightness: f32,
}

impl VirtualDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ambient_light(50.0)
    }

    /// A display whose light sensor starts settled at `percent`.
    #[must_use]
    pub fn with_ambient_light(percent: f32) -> Self {
        Self {
            frame: Bitmap::new(),
            ambient: MovingAverage::new(percent.clamp(0.0, 100.0)),
            brightness: 0.0,
        }
    }

    /// Feed one raw light sensor sample.
    pub fn feed_ambient_light(&mut self, percent: f32) {
        self.ambient.put(percent.clamp(0.0, 100.0));
    }

    /// Last brightness requested by the UI.
    #[must_use]
    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    #[must_use]
    pub const fn bitmap(&self) -> &Bitmap {
        &self.frame
    }

    /// Text rendering of the frame, one line per row, `#` for lit pixels.
    #[cfg(feature = "host")]
    #[must_use]
    pub fn to_ascii(&self) -> std::string::String {
        use crate::shared_constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

        let mut ascii = std::string::String::new();
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                ascii.push(if self.frame.pixel(x, y) { '#' } else { '.' });
            }
            ascii.push('\n');
        }
        ascii
    }

    /// Save the frame as an RGB PNG, lit pixels red, scaled by the current brightness.
    ///
    /// # Errors
    ///
    /// Returns the I/O or encoder error.
    #[cfg(feature = "host")]
    pub fn write_png(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::{fs::File, io::BufWriter, vec::Vec};

        use png::{BitDepth, ColorType, Encoder};

        use crate::shared_constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

        let level = 55 + (self.brightness.clamp(0.0, 100.0) * 2.0) as u8;
        let mut pixels = Vec::with_capacity((DISPLAY_WIDTH * DISPLAY_HEIGHT * 3) as usize);
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                let red = if self.frame.pixel(x, y) { level } else { 0 };
                pixels.extend_from_slice(&[red, 0, 0]);
            }
        }

        let file = File::create(path)?;
        let mut encoder = Encoder::new(
            BufWriter::new(file),
            DISPLAY_WIDTH.unsigned_abs(),
            DISPLAY_HEIGHT.unsigned_abs(),
        );
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
        writer
            .write_image_data(&pixels)
            .map_err(std::io::Error::other)
    }
}

impl Default for VirtualDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for VirtualDisplay {
    fn frame(&mut self) -> &mut Bitmap {
        &mut self.frame
    }

    fn ambient_light(&mut self) -> f32 {
        self.ambient.get()
    }

    fn set_brightness(&mut self, percent: f32) {
        self.brightness = percent;
    }
}
