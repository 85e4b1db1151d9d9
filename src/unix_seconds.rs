//! Unit-safe wrappers for the two epochs the clock juggles.

use crate::shared_constants::SECONDS_PER_MINUTE;

/// Units-safe wrapper for Unix timestamps (seconds since 1970-01-01 00:00:00 UTC)
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    /// Get the underlying i64 value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Convert NTP seconds (since 1900-01-01) to Unix seconds (since 1970-01-01)
    #[must_use]
    pub const fn from_ntp_seconds(ntp: u32) -> Option<Self> {
        // 1900→1970 offset: 70 years * 365.25 days/year * 86400 seconds/day
        const NTP_TO_UNIX_SECONDS: i64 = 2_208_988_800;
        let s = (ntp as i64) - NTP_TO_UNIX_SECONDS;
        // Reject negative (pre-1970)
        if s >= 0 { Some(Self(s)) } else { None }
    }

    /// Shift into local standard time (no daylight saving applied).
    #[must_use]
    pub const fn to_local(self, utc_offset_minutes: i32) -> LocalSeconds {
        LocalSeconds(self.0 + utc_offset_minutes as i64 * SECONDS_PER_MINUTE)
    }
}

/// Seconds since 1970-01-01 00:00:00 in local *standard* time.
///
/// This is the engine's canonical epoch. It never contains the daylight saving hour;
/// that is added only when expanding to calendar fields.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalSeconds(pub i64);

impl LocalSeconds {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn plus(self, seconds: i64) -> Self {
        Self(self.0 + seconds)
    }

    #[must_use]
    pub const fn minus(self, seconds: i64) -> Self {
        Self(self.0 - seconds)
    }
}
