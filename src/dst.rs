//! Regional daylight saving time.
//!
//! The engine stores DST-unaware local seconds. [`DstWindow::consider`] adds the DST hour
//! when expanding for display, and [`DstWindow::unconsider`] removes it from a wall-clock
//! time entered by the user. Around the autumn transition the same wall-clock hour happens
//! twice, so `unconsider` falls back on the last answer `consider` gave.

use crate::{
    broken_down_time::BrokenDownTime,
    shared_constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE},
    unix_seconds::LocalSeconds,
};

/// Supported daylight saving rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DstRegion {
    /// DST is never active.
    #[default]
    None,
    /// Last Sunday of March 01:00 UTC until last Sunday of October 01:00 UTC.
    Europe,
}

impl DstRegion {
    /// Parse a region name as used in `.env` files (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("none") || name.is_empty() {
            Some(Self::None)
        } else if name.eq_ignore_ascii_case("europe") {
            Some(Self::Europe)
        } else {
            None
        }
    }
}

/// Cached DST boundaries of one year, in local standard seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DstBounds {
    pub year_start: LocalSeconds,
    pub dst_start: LocalSeconds,
    pub dst_end: LocalSeconds,
}

impl DstBounds {
    const CACHE_SPAN: i64 = 366 * SECONDS_PER_DAY;

    const fn covers(&self, time: LocalSeconds) -> bool {
        time.as_i64() >= self.year_start.as_i64()
            && time.as_i64() < self.year_start.as_i64() + Self::CACHE_SPAN
    }
}

/// Per-year DST cache plus the last answer given, used to resolve the repeated hour.
#[derive(Clone, Debug)]
pub struct DstWindow {
    region: DstRegion,
    utc_offset_minutes: i32,
    bounds: Option<DstBounds>,
    last_known_active: bool,
    recompute_count: u32,
}

impl DstWindow {
    #[must_use]
    pub const fn new(region: DstRegion, utc_offset_minutes: i32) -> Self {
        Self {
            region,
            utc_offset_minutes,
            bounds: None,
            last_known_active: false,
            recompute_count: 0,
        }
    }

    /// Add the DST hour if DST is active at `time`, remembering the answer.
    pub fn consider(&mut self, time: LocalSeconds) -> LocalSeconds {
        let active = self.is_active(time);
        self.last_known_active = active;
        if active { time.plus(SECONDS_PER_HOUR) } else { time }
    }

    /// Remove the DST hour from a wall-clock time.
    ///
    /// When `time` and `time - 1h` disagree about DST, `time` sits in a transition hour and
    /// the answer remembered by the last [`consider`](Self::consider) decides.
    pub fn unconsider(&mut self, time: LocalSeconds) -> LocalSeconds {
        let active_now = self.is_active(time);
        let active_hour_before = self.is_active(time.minus(SECONDS_PER_HOUR));
        let active = if active_now == active_hour_before {
            active_now
        } else {
            self.last_known_active
        };
        if active { time.minus(SECONDS_PER_HOUR) } else { time }
    }

    /// Whether DST applies at `time` (local standard seconds).
    pub fn is_active(&mut self, time: LocalSeconds) -> bool {
        if self.region == DstRegion::None {
            return false;
        }
        let bounds = match self.bounds {
            Some(bounds) if bounds.covers(time) => bounds,
            _ => match self.recompute(time) {
                Some(bounds) => bounds,
                None => return false,
            },
        };
        bounds.dst_start <= time && time < bounds.dst_end
    }

    /// Boundaries currently cached, if any.
    #[must_use]
    pub const fn bounds(&self) -> Option<DstBounds> {
        self.bounds
    }

    /// How many times the boundaries were computed; once per calendar year in steady state.
    #[must_use]
    pub const fn recompute_count(&self) -> u32 {
        self.recompute_count
    }

    #[must_use]
    pub const fn last_known_active(&self) -> bool {
        self.last_known_active
    }

    fn recompute(&mut self, time: LocalSeconds) -> Option<DstBounds> {
        self.recompute_count = self.recompute_count.saturating_add(1);
        let bounds = self.bounds_for_year_of(time);
        if bounds.is_none() {
            warn!("DST window could not be computed for {}", time.as_i64());
        }
        self.bounds = bounds;
        bounds
    }

    fn bounds_for_year_of(&self, time: LocalSeconds) -> Option<DstBounds> {
        let year = BrokenDownTime::from_local(time).ok()?.year;
        let year_start = BrokenDownTime::new(year, 1, 1, 0, 0, 0).ok()?.to_local().ok()?;
        // 01:00 UTC expressed in local standard time.
        let switch_second =
            SECONDS_PER_HOUR + i64::from(self.utc_offset_minutes) * SECONDS_PER_MINUTE;
        let dst_start = last_sunday(year, 3)?.plus(switch_second);
        let dst_end = last_sunday(year, 10)?.plus(switch_second);
        Some(DstBounds {
            year_start,
            dst_start,
            dst_end,
        })
    }
}

/// Midnight starting the last Sunday of `month`.
///
/// Day 31 is normalized first, which lands on the month's real last day or rolls over;
/// stepping back by its weekday number reaches the Sunday.
fn last_sunday(year: i32, month: u8) -> Option<LocalSeconds> {
    let day_31 = BrokenDownTime::new(year, month, 31, 0, 0, 0).ok()?;
    let back = i64::from(day_31.weekday.number_days_from_sunday());
    Some(day_31.to_local().ok()?.minus(back * SECONDS_PER_DAY))
}
