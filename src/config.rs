//! Build-time clock configuration.
//!
//! `build.rs` loads `.env` files with `dotenvy` and exports the values below as
//! compile-time environment variables:
//!
//! - `UTC_OFFSET_MINUTES`: offset of local standard time, e.g. `60` for Central Europe
//! - `DST_REGION`: `none` or `europe`
//!
//! Malformed values fall back to UTC without daylight saving and are reported in the log.

use crate::dst::DstRegion;

/// Where on Earth the clock hangs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Offset of local standard time from UTC.
    pub utc_offset_minutes: i32,
    pub dst_region: DstRegion,
}

impl ClockConfig {
    #[must_use]
    pub const fn new(utc_offset_minutes: i32, dst_region: DstRegion) -> Self {
        Self {
            utc_offset_minutes,
            dst_region,
        }
    }

    /// Parse the values baked in by `build.rs`.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::parse(env!("UTC_OFFSET_MINUTES"), env!("DST_REGION"))
    }

    /// Parse textual configuration values, falling back per field.
    #[must_use]
    pub fn parse(utc_offset_minutes: &str, dst_region: &str) -> Self {
        let utc_offset_minutes = utc_offset_minutes.trim().parse::<i32>().unwrap_or_else(|_| {
            warn!("UTC_OFFSET_MINUTES is not an integer; using 0");
            0
        });
        let dst_region = DstRegion::from_name(dst_region).unwrap_or_else(|| {
            warn!("DST_REGION is not supported; daylight saving disabled");
            DstRegion::None
        });
        Self::new(utc_offset_minutes, dst_region)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new(0, DstRegion::None)
    }
}
