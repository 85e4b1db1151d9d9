//! Calendar expansion of [`LocalSeconds`], with the normalization rules the editors rely on.

use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, Weekday};

use crate::{Result, unix_seconds::LocalSeconds};

/// Calendar representation of a local time.
///
/// `month` is 1-based and `weekday` is derived; it is ignored when converting back to
/// seconds. `day` may exceed the month length when converting back: the overflow rolls into
/// the following month, so "31 February" becomes early March.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrokenDownTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: Weekday,
}

impl BrokenDownTime {
    /// Build a calendar time, deriving the weekday.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CalendarOutOfRange`] when a field cannot be represented.
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        let mut broken_down = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday: Weekday::Thursday,
        };
        broken_down = Self::from_local(broken_down.to_local()?)?;
        Ok(broken_down)
    }

    /// Expand epoch seconds into calendar fields.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CalendarOutOfRange`] outside the years the `time` crate supports.
    pub fn from_local(seconds: LocalSeconds) -> Result<Self> {
        let date_time = OffsetDateTime::from_unix_timestamp(seconds.as_i64())?;
        Ok(Self {
            year: date_time.year(),
            month: u8::from(date_time.month()),
            day: date_time.day(),
            hour: date_time.hour(),
            minute: date_time.minute(),
            second: date_time.second(),
            weekday: date_time.weekday(),
        })
    }

    /// Collapse calendar fields to epoch seconds, normalizing day overflow.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CalendarOutOfRange`] for a month outside 1..=12 or a time of
    /// day outside 00:00:00..=23:59:59.
    pub fn to_local(&self) -> Result<LocalSeconds> {
        let month = Month::try_from(self.month)?;
        let first_of_month = Date::from_calendar_date(self.year, month, 1)?;
        let date = first_of_month
            .checked_add(Duration::days(i64::from(self.day) - 1))
            .ok_or(crate::Error::CalendarOutOfRange)?;
        let time_of_day = Time::from_hms(self.hour, self.minute, self.second)?;
        let date_time = PrimitiveDateTime::new(date, time_of_day).assume_utc();
        Ok(LocalSeconds(date_time.unix_timestamp()))
    }

    /// Bit of this weekday in an alarm weekday mask (Sunday is bit 0).
    #[must_use]
    pub const fn weekday_bit(&self) -> u8 {
        weekday_bit(self.weekday)
    }
}

/// Bit of `weekday` in an alarm weekday mask (Sunday is bit 0).
#[must_use]
pub const fn weekday_bit(weekday: Weekday) -> u8 {
    1 << weekday.number_days_from_sunday()
}

/// Number of days in `month` (1-based) of `year`. Out-of-range months report 31.
#[must_use]
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if time::util::is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Convert a 0..=23 hour for display, returning `(displayed_hour, morning)`.
///
/// In 12-hour format midnight and noon show as 12.
#[must_use]
pub const fn convert_hour(hour: u8, format_24h: bool) -> (u8, bool) {
    let morning = hour < 12;
    if format_24h {
        return (hour, morning);
    }
    let displayed = match hour % 12 {
        0 => 12,
        other => other,
    };
    (displayed, morning)
}
