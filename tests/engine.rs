//! Host-level tests for the time engine.

mod common;

use clock_kit::{
    alarm::{AlarmConfig, AlarmId, AlarmMode, WORKDAYS},
    config::ClockConfig,
    dst::DstRegion,
    engine::{SyncState, TimeEngine},
    settings::{Settings, SettingsValues},
    shared_constants::{FRAME_RATE, SECONDS_PER_HOUR},
    unix_seconds::UnixSeconds,
};
use common::{ScriptedClock, date_time, free_running_engine};
use time::Weekday;

const FRAMES_PER_SECOND: u32 = FRAME_RATE as u32;

fn run(
    engine: &mut TimeEngine<ScriptedClock>,
    settings: &mut Settings,
    frames: u32,
) -> Vec<AlarmId> {
    (0..frames)
        .filter_map(|_| engine.tick(settings).fired_alarm)
        .collect()
}

#[test]
fn free_running_engine_counts_one_second_per_frame_rate_ticks() {
    let mut engine = free_running_engine();
    let mut settings = Settings::default();
    assert_eq!(engine.sync_state(), SyncState::Settled);
    assert_eq!(engine.now().year, 1970);
    assert_eq!(engine.now().weekday, Weekday::Thursday);

    run(&mut engine, &mut settings, FRAMES_PER_SECOND - 1);
    assert_eq!(engine.now().second, 0);
    run(&mut engine, &mut settings, 1);
    assert_eq!(engine.now().second, 1);
    assert_eq!(engine.tick_count(), 0);

    run(&mut engine, &mut settings, FRAMES_PER_SECOND * 59);
    assert_eq!((engine.now().minute, engine.now().second), (1, 0));
}

#[test]
fn first_tick_reports_time_adjusted() {
    let mut engine = free_running_engine();
    let mut settings = Settings::default();
    assert!(engine.tick(&mut settings).time_adjusted);
    assert!(!engine.tick(&mut settings).time_adjusted);
}

#[test]
fn hardware_clock_is_adopted_when_its_second_changes() {
    let clock = ScriptedClock::new([
        Ok(date_time(2024, 3, 6, 6, 59, 58)),
        Ok(date_time(2024, 3, 6, 6, 59, 58)),
        Ok(date_time(2024, 3, 6, 6, 59, 59)),
    ]);
    let mut engine = TimeEngine::new(Some(clock), ClockConfig::default());
    let mut settings = Settings::default();
    assert_eq!(engine.sync_state(), SyncState::AdoptingFromHardwareClock);
    assert_eq!(engine.now().second, 58);

    run(&mut engine, &mut settings, 1);
    assert_eq!(engine.sync_state(), SyncState::AdoptingFromHardwareClock);

    run(&mut engine, &mut settings, 1);
    assert_eq!(engine.sync_state(), SyncState::Settled);
    assert_eq!(engine.now().second, 59);
    assert_eq!(engine.tick_count(), 0);
    assert!(engine.has_hardware_clock());

    run(&mut engine, &mut settings, FRAMES_PER_SECOND);
    assert_eq!((engine.now().hour, engine.now().minute), (7, 0));
}

#[test]
fn hardware_clock_failing_first_read_is_released() {
    let clock = ScriptedClock::new([]);
    let engine = TimeEngine::new(Some(clock), ClockConfig::default());
    assert_eq!(engine.sync_state(), SyncState::Settled);
    assert!(!engine.has_hardware_clock());
    assert_eq!(engine.now().year, 1970);
}

#[test]
fn read_failure_while_adopting_keeps_free_running() {
    let clock = ScriptedClock::new([Ok(date_time(2024, 3, 6, 12, 0, 0))]);
    let mut engine = TimeEngine::new(Some(clock), ClockConfig::default());
    let mut settings = Settings::default();

    run(&mut engine, &mut settings, 1);
    assert_eq!(engine.sync_state(), SyncState::Settled);
    assert!(engine.has_hardware_clock());
    assert_eq!(engine.now().hour, 12);
}

#[test]
fn network_time_is_written_to_the_hardware_clock_on_the_next_second() {
    let clock = ScriptedClock::ticking(
        date_time(2024, 3, 6, 6, 0, 0),
        date_time(2024, 3, 6, 6, 0, 1),
    );
    let mut engine = TimeEngine::new(Some(clock), ClockConfig::new(60, DstRegion::None));
    let mut settings = Settings::default();
    run(&mut engine, &mut settings, 1);
    assert_eq!(engine.sync_state(), SyncState::Settled);

    // 2024-03-06 10:00:00 UTC
    engine.apply_network_time(UnixSeconds(1_709_719_200), 0);
    assert_eq!(engine.sync_state(), SyncState::PropagatingToHardwareClock);
    assert_eq!((engine.now().hour, engine.now().minute), (11, 0));
    assert!(engine.tick(&mut settings).time_adjusted);

    run(&mut engine, &mut settings, FRAMES_PER_SECOND);
    assert_eq!(engine.sync_state(), SyncState::Settled);
    let writes = engine
        .hardware_clock_mut()
        .map(|clock| clock.writes().to_vec())
        .unwrap_or_default();
    assert_eq!(writes, vec![date_time(2024, 3, 6, 11, 0, 1)]);
}

#[test]
fn network_time_keeps_its_sub_second_phase() {
    let mut engine = free_running_engine();
    engine.apply_network_time(UnixSeconds(1_709_719_200), 500);
    assert_eq!(engine.tick_count(), i32::from(FRAME_RATE) / 2);
}

#[test]
fn set_removes_the_dst_hour_before_storing() {
    let mut engine: TimeEngine<ScriptedClock> =
        TimeEngine::new(None, ClockConfig::new(60, DstRegion::Europe));
    let summer = date_time(2024, 7, 1, 12, 0, 0);
    engine.set(&summer);

    assert_eq!(engine.now().hour, 12);
    let stored = summer.to_local().map(|local| local.as_i64()).unwrap_or_default();
    assert_eq!(engine.local_seconds().as_i64(), stored - SECONDS_PER_HOUR);
}

#[test]
fn set_ignores_an_invalid_time() {
    let mut engine = free_running_engine();
    let before = *engine.now();
    let mut invalid = date_time(2024, 3, 6, 12, 0, 0);
    invalid.hour = 24;
    engine.set(&invalid);
    assert_eq!(*engine.now(), before);
}

#[test]
fn alarm_fires_once_on_the_first_tick_of_its_minute() {
    let mut engine = free_running_engine();
    let mut settings = Settings::default();
    engine.set_alarm(AlarmId::First, AlarmConfig::new(AlarmMode::Loud, 7, 0, WORKDAYS));
    // Wednesday
    engine.set(&date_time(2024, 3, 6, 6, 59, 59));
    engine.reset_ticks();

    let mut first_fire = None;
    for frame in 0..FRAMES_PER_SECOND * 2 {
        if let Some(id) = engine.tick(&mut settings).fired_alarm {
            first_fire = Some((frame, id));
            break;
        }
    }
    assert_eq!(first_fire, Some((FRAMES_PER_SECOND, AlarmId::First)));
    assert_eq!((engine.now().hour, engine.now().minute), (7, 0));

    assert!(run(&mut engine, &mut settings, FRAMES_PER_SECOND * 120).is_empty());
}

#[test]
fn alarm_does_not_fire_on_a_disabled_weekday() {
    let mut engine = free_running_engine();
    let mut settings = Settings::default();
    engine.set_alarm(AlarmId::First, AlarmConfig::new(AlarmMode::Loud, 7, 0, WORKDAYS));
    // Saturday
    engine.set(&date_time(2024, 3, 9, 6, 59, 59));
    engine.reset_ticks();
    assert!(run(&mut engine, &mut settings, FRAMES_PER_SECOND * 3).is_empty());
}

#[test]
fn first_alarm_wins_when_both_are_due() {
    let mut engine = free_running_engine();
    let mut settings = Settings::default();
    engine.set_alarm(AlarmId::First, AlarmConfig::new(AlarmMode::Gradual, 7, 0, WORKDAYS));
    engine.set_alarm(AlarmId::Second, AlarmConfig::new(AlarmMode::Loud, 7, 0, WORKDAYS));
    engine.set(&date_time(2024, 3, 6, 6, 59, 59));
    engine.reset_ticks();
    assert_eq!(
        run(&mut engine, &mut settings, FRAMES_PER_SECOND * 3),
        vec![AlarmId::First]
    );
}

#[test]
fn skip_next_alarm_consumes_exactly_one_firing() {
    let mut engine = free_running_engine();
    let mut settings = Settings::new(SettingsValues {
        skip_next_alarm: true,
        ..SettingsValues::default()
    });
    engine.set_alarm(AlarmId::First, AlarmConfig::new(AlarmMode::Loud, 7, 0, WORKDAYS));
    engine.set(&date_time(2024, 3, 6, 6, 59, 59));
    engine.reset_ticks();

    assert!(run(&mut engine, &mut settings, FRAMES_PER_SECOND * 3).is_empty());
    assert!(!settings.get().skip_next_alarm);
    assert!(settings.is_write_pending());

    engine.set(&date_time(2024, 3, 7, 6, 59, 59));
    engine.reset_ticks();
    assert_eq!(
        run(&mut engine, &mut settings, FRAMES_PER_SECOND * 3),
        vec![AlarmId::First]
    );
}

#[test]
fn set_alarm_normalizes_an_alarm_without_weekdays() {
    let mut engine = free_running_engine();
    engine.set_alarm(AlarmId::Second, AlarmConfig::new(AlarmMode::Loud, 7, 0, 0));
    assert_eq!(engine.alarms()[1].mode, AlarmMode::Off);
    assert!(!engine.is_alarm_on());
}

#[test]
fn next_alarm_follows_the_current_time() {
    let mut engine = free_running_engine();
    engine.set_alarm(AlarmId::First, AlarmConfig::new(AlarmMode::Loud, 7, 0, WORKDAYS));
    engine.set(&date_time(2024, 3, 6, 8, 0, 0));
    let next = engine.next_alarm(false).map(|next| next.weekday);
    assert_eq!(next, Some(Weekday::Thursday));
    let skipped = engine.next_alarm(true).map(|next| next.weekday);
    assert_eq!(skipped, Some(Weekday::Friday));
}

#[test]
fn temperature_comes_from_the_hardware_clock() {
    let clock = ScriptedClock::new([Ok(date_time(2024, 3, 6, 12, 0, 0))]).with_temperature(21.5);
    let mut engine = TimeEngine::new(Some(clock), ClockConfig::default());
    assert_eq!(engine.temperature(), Some(21.5));
    engine.sample_temperature();
    let samples = engine.hardware_clock_mut().map(|clock| clock.temperature_samples());
    assert_eq!(samples, Some(1));

    assert_eq!(free_running_engine().temperature(), None);
}
