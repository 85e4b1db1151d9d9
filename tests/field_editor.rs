//! Host-level tests for bounded field editing and the wrapping counter.

use clock_kit::broken_down_time::days_in_month;
use clock_kit::cyclic_counter::CyclicCounter;
use clock_kit::field_editor::{Direction, FieldSpec, adjust_field, adjust_u8, cycle};
use clock_kit::settings::HourlyChime;

#[test]
fn single_steps_wrap_at_both_ends() {
    assert_eq!(adjust_u8(Direction::Up, FieldSpec::HOUR, 23), 0);
    assert_eq!(adjust_u8(Direction::Down, FieldSpec::HOUR, 0), 23);
    assert_eq!(adjust_field(Direction::Up, FieldSpec::YEAR, 2199), 2000);
    assert_eq!(adjust_u8(Direction::Down, FieldSpec::MONTH, 1), 12);
    assert_eq!(adjust_field(Direction::Down, FieldSpec::BRIGHTNESS_POINT, -100), 100);
}

#[test]
fn up_then_down_returns_to_the_start() {
    for minute in 0..60 {
        let up = adjust_u8(Direction::Up, FieldSpec::MINUTE, minute);
        assert_eq!(adjust_u8(Direction::Down, FieldSpec::MINUTE, up), minute);
    }
}

#[test]
fn repeated_up_snaps_to_the_next_big_step() {
    assert_eq!(adjust_u8(Direction::RepeatedUp, FieldSpec::MINUTE, 7), 10);
    assert_eq!(adjust_u8(Direction::RepeatedUp, FieldSpec::MINUTE, 10), 20);
    assert_eq!(adjust_u8(Direction::RepeatedUp, FieldSpec::MINUTE, 55), 0);
    assert_eq!(adjust_field(Direction::RepeatedUp, FieldSpec::YEAR, 2024), 2030);
    assert_eq!(adjust_u8(Direction::RepeatedUp, FieldSpec::MONTH, 2), 4);
}

#[test]
fn repeated_down_snaps_to_the_previous_big_step() {
    assert_eq!(adjust_u8(Direction::RepeatedDown, FieldSpec::MINUTE, 17), 10);
    assert_eq!(adjust_u8(Direction::RepeatedDown, FieldSpec::MINUTE, 10), 0);
    assert_eq!(adjust_u8(Direction::RepeatedDown, FieldSpec::MINUTE, 0), 50);
    assert_eq!(adjust_field(Direction::RepeatedDown, FieldSpec::MANUAL_BRIGHTNESS, 0), 100);
}

#[test]
fn repeated_moves_land_on_multiples_of_the_big_step() {
    for hour in 0..24 {
        for direction in [Direction::RepeatedUp, Direction::RepeatedDown] {
            assert_eq!(adjust_u8(direction, FieldSpec::HOUR, hour) % 6, 0);
        }
    }
}

#[test]
fn day_range_follows_the_month_length() {
    let february_leap = FieldSpec::day(days_in_month(2024, 2));
    assert_eq!(adjust_u8(Direction::Up, february_leap, 29), 1);
    assert_eq!(adjust_u8(Direction::Down, february_leap, 1), 29);

    let february = FieldSpec::day(days_in_month(2023, 2));
    assert_eq!(adjust_u8(Direction::Up, february, 28), 1);
    assert_eq!(days_in_month(2024, 4), 30);
    assert_eq!(days_in_month(2024, 12), 31);
}

#[test]
fn cycle_steps_through_variants_and_wraps() {
    assert_eq!(cycle(&HourlyChime::ALL, HourlyChime::Off, Direction::Up), HourlyChime::On);
    assert_eq!(
        cycle(&HourlyChime::ALL, HourlyChime::DaylightOnly, Direction::RepeatedUp),
        HourlyChime::Off
    );
    assert_eq!(
        cycle(&HourlyChime::ALL, HourlyChime::Off, Direction::Down),
        HourlyChime::DaylightOnly
    );
}

#[test]
fn cyclic_counter_reports_wraps() {
    let mut counter = CyclicCounter::new(3);
    assert!(!counter.increment());
    assert!(!counter.increment());
    assert!(counter.increment());
    assert_eq!(counter.value(), 0);
}

#[test]
fn stopped_cyclic_counter_restarts_at_zero() {
    let mut counter = CyclicCounter::starting_at(125, -1);
    assert!(counter.is_stopped());
    counter.increment();
    assert_eq!(counter.value(), 0);

    counter.set(130);
    assert_eq!(counter.value(), 5);
    counter.stop();
    assert_eq!(counter.value(), -1);
}

#[test]
fn cyclic_counter_rescales_a_fraction_of_its_cycle() {
    let mut counter = CyclicCounter::new(125);
    counter.rescale(500, 1000);
    assert_eq!(counter.value(), 62);

    counter.set_wrap(50);
    assert_eq!(counter.value(), 12);
}
