//! DS3231 temperature-compensated RTC over I²C.
//!
//! See the [datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/DS3231.pdf)
//! for the register map. The chip stores BCD digits, a 1..=7 weekday, a two digit year and
//! a century flag in bit 7 of the month register.

use embedded_hal::i2c::I2c;

use crate::{
    Error, Result, broken_down_time::BrokenDownTime, moving_average::MovingAverage,
    rtc::HardwareClock,
};

/// 7-bit I²C address of the DS3231.
pub const DS3231_ADDRESS: u8 = 0x68;

const TIME_REGISTER: u8 = 0x00;
const TEMPERATURE_REGISTER: u8 = 0x11;
const CENTURY_FLAG: u8 = 0x80;
const TEMPERATURE_FILTER_LEN: usize = 32;

/// A DS3231 on an `embedded-hal` I²C bus.
pub struct Ds3231<I2C> {
    i2c: I2C,
    temperature_filter: MovingAverage<TEMPERATURE_FILTER_LEN>,
    temperature_requested: bool,
}

impl<I2C: I2c> Ds3231<I2C> {
    /// Take ownership of the bus. The temperature filter is primed with one reading;
    /// if that fails it starts at 0 °C and converges over the next samples.
    pub fn new(mut i2c: I2C) -> Self {
        let initial = read_raw_temperature(&mut i2c).unwrap_or_else(|err| {
            warn!("DS3231: initial temperature read failed: {}", err);
            0.0
        });
        Self {
            i2c,
            temperature_filter: MovingAverage::new(initial),
            temperature_requested: false,
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> HardwareClock for Ds3231<I2C> {
    fn read(&mut self) -> Result<BrokenDownTime> {
        let mut registers = [0u8; 7];
        self.i2c
            .write_read(DS3231_ADDRESS, &[TIME_REGISTER], &mut registers)
            .map_err(|_| Error::HardwareClockBus)?;
        let [second, minute, hour, _weekday, day, month, year] = registers;

        let century = if month & CENTURY_FLAG == 0 { 2000 } else { 2100 };
        // Weekday is derived from the date; the chip's counter is only written.
        BrokenDownTime::new(
            century + i32::from(from_bcd(year, 0, 99)),
            from_bcd(month & 0x1F, 1, 12),
            from_bcd(day, 1, 31),
            from_bcd(hour, 0, 23),
            from_bcd(minute, 0, 59),
            from_bcd(second, 0, 59),
        )
        .map_err(|_| Error::HardwareClockData)
    }

    fn write(&mut self, time: &BrokenDownTime) -> Result<()> {
        let year = u8::try_from(time.year.rem_euclid(100)).map_err(|_| Error::HardwareClockData)?;
        let mut month = to_bcd(time.month);
        if time.year >= 2100 {
            month |= CENTURY_FLAG;
        }
        let frame = [
            TIME_REGISTER,
            to_bcd(time.second),
            to_bcd(time.minute),
            to_bcd(time.hour),
            to_bcd(time.weekday.number_from_sunday()),
            to_bcd(time.day),
            month,
            to_bcd(year),
        ];
        self.i2c
            .write(DS3231_ADDRESS, &frame)
            .map_err(|_| Error::HardwareClockBus)
    }

    fn temperature(&mut self) -> Option<f32> {
        self.temperature_requested = true;
        Some(self.temperature_filter.get())
    }

    fn sample_temperature(&mut self) {
        if !self.temperature_requested {
            return;
        }
        self.temperature_requested = false;
        match read_raw_temperature(&mut self.i2c) {
            Ok(celsius) => self.temperature_filter.put(celsius),
            Err(err) => warn!("DS3231: temperature read failed: {}", err),
        }
    }
}

/// Whole degrees in 0x11 (signed), quarter degrees in the top two bits of 0x12.
fn read_raw_temperature<I2C: I2c>(i2c: &mut I2C) -> Result<f32> {
    let mut registers = [0u8; 2];
    i2c.write_read(DS3231_ADDRESS, &[TEMPERATURE_REGISTER], &mut registers)
        .map_err(|_| Error::HardwareClockBus)?;
    let [whole, fraction] = registers;
    let whole = i8::from_ne_bytes([whole]);
    Ok(f32::from(whole) + f32::from(fraction >> 6) * 0.25)
}

fn from_bcd(value: u8, min: u8, max: u8) -> u8 {
    ((value >> 4) * 10 + (value & 0x0F)).clamp(min, max)
}

const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) + value % 10
}
