//! Host-level tests for daylight saving and the build-time configuration.

use clock_kit::{
    broken_down_time::BrokenDownTime,
    config::ClockConfig,
    dst::{DstRegion, DstWindow},
    shared_constants::SECONDS_PER_HOUR,
    unix_seconds::LocalSeconds,
};

/// Local standard seconds of a calendar time.
fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> LocalSeconds {
    BrokenDownTime::new(year, month, day, hour, minute, 0)
        .and_then(|time| time.to_local())
        .expect("valid calendar time")
}

/// Central Europe: UTC+1, switching at 01:00 UTC, which is 02:00 local standard time.
fn central_europe() -> DstWindow {
    DstWindow::new(DstRegion::Europe, 60)
}

#[test]
fn dst_starts_on_the_last_sunday_of_march() {
    let mut dst = central_europe();
    assert!(!dst.is_active(local(2024, 3, 31, 1, 59)));
    assert!(dst.is_active(local(2024, 3, 31, 2, 0)));
    assert!(!dst.is_active(local(2024, 3, 24, 12, 0)));
}

#[test]
fn dst_ends_on_the_last_sunday_of_october() {
    let mut dst = central_europe();
    assert!(dst.is_active(local(2024, 10, 27, 1, 59)));
    assert!(!dst.is_active(local(2024, 10, 27, 2, 0)));
    assert!(dst.is_active(local(2024, 10, 20, 12, 0)));
}

#[test]
fn consider_adds_the_hour_in_summer_only() {
    let mut dst = central_europe();
    let summer = local(2024, 7, 1, 12, 0);
    assert_eq!(dst.consider(summer), summer.plus(SECONDS_PER_HOUR));
    assert!(dst.last_known_active());

    let winter = local(2024, 1, 15, 12, 0);
    assert_eq!(dst.consider(winter), winter);
    assert!(!dst.last_known_active());
}

#[test]
fn unconsider_reverses_consider_away_from_transitions() {
    let mut dst = central_europe();
    for time in [local(2024, 7, 1, 12, 0), local(2024, 1, 15, 12, 0)] {
        let wall_clock = dst.consider(time);
        assert_eq!(dst.unconsider(wall_clock), time);
    }
}

#[test]
fn repeated_autumn_hour_follows_the_last_displayed_answer() {
    // 02:30 on the wall happens twice on 2024-10-27.
    let wall_clock = local(2024, 10, 27, 2, 30);

    let mut dst = central_europe();
    let _ = dst.consider(local(2024, 10, 27, 1, 0));
    assert_eq!(dst.unconsider(wall_clock), wall_clock.minus(SECONDS_PER_HOUR));

    let _ = dst.consider(local(2024, 10, 27, 2, 0));
    assert_eq!(dst.unconsider(wall_clock), wall_clock);
}

#[test]
fn boundaries_are_computed_once_per_year() {
    let mut dst = central_europe();
    for day in 1..=28 {
        for month in 1..=12 {
            let _ = dst.consider(local(2024, month, day, 12, 0));
        }
    }
    assert_eq!(dst.recompute_count(), 1);
    assert!(dst.bounds().is_some());

    let _ = dst.consider(local(2025, 6, 1, 12, 0));
    assert_eq!(dst.recompute_count(), 2);
}

#[test]
fn region_none_is_never_active() {
    let mut dst = DstWindow::new(DstRegion::None, 60);
    let summer = local(2024, 7, 1, 12, 0);
    assert_eq!(dst.consider(summer), summer);
    assert_eq!(dst.recompute_count(), 0);
}

#[test]
fn region_names_parse_case_insensitively() {
    assert_eq!(DstRegion::from_name("Europe"), Some(DstRegion::Europe));
    assert_eq!(DstRegion::from_name(" none "), Some(DstRegion::None));
    assert_eq!(DstRegion::from_name(""), Some(DstRegion::None));
    assert_eq!(DstRegion::from_name("mars"), None);
}

#[test]
fn config_falls_back_per_field() {
    assert_eq!(
        ClockConfig::parse("60", "europe"),
        ClockConfig::new(60, DstRegion::Europe)
    );
    assert_eq!(
        ClockConfig::parse("sixty", "europe"),
        ClockConfig::new(0, DstRegion::Europe)
    );
    assert_eq!(
        ClockConfig::parse("-300", "mars"),
        ClockConfig::new(-300, DstRegion::None)
    );
}
