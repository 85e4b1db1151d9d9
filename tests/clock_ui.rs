//! Host-level tests for the UI orchestrator: navigation, editing, ringing and brightness.

mod common;

use clock_kit::{
    alarm::{ALL_WEEKDAYS, AlarmConfig, AlarmId, AlarmMode, WORKDAYS},
    bitmap::Indicator,
    button::{ButtonEvent, ButtonId},
    inbox::{ClockEvent, ClockInbox},
    ntp::NtpTime,
    screens::{CountdownState, MenuId, ROOT_MENU, ScreenKind},
    settings::{HourlyChime, SettingsValues, WRITE_DELAY_FRAMES},
    settings_block::{MemoryStorage, SettingsBlock},
    shared_constants::{BLINK_DISAPPEAR_FRAME, FRAME_RATE, STOP_RINGING_AFTER_SECS},
    ui::MenuContext,
    unix_seconds::UnixSeconds,
    wifi_status::WifiStatus,
};
use common::{TestUi, date_time, tick_n, ui, ui_with_storage};

const FRAMES_PER_SECOND: u32 = FRAME_RATE as u32;

// Root menu layout.
const HOUR_MIN_SEC: usize = 0;
const HOUR_MIN_BAR: usize = 1;
const HOUR_MIN: usize = 2;
const DATE: usize = 3;
const ALARMS: usize = 5;
const COUNTDOWN: usize = 6;
const STOPWATCH: usize = 7;
const WIFI: usize = 8;
const OPTIONS: usize = 9;

const ALARMS_MENU: MenuId = MenuId(1);
const COUNTDOWN_MENU: MenuId = MenuId(2);
const STOPWATCH_MENU: MenuId = MenuId(3);

fn press(ui: &mut TestUi, button: ButtonId) {
    ui.handle_event(ClockEvent::Button(ButtonEvent::pressed(button)));
}

fn hold(ui: &mut TestUi, button: ButtonId) {
    ui.handle_event(ClockEvent::Button(ButtonEvent::repeated(button)));
}

fn selected(ui: &TestUi) -> usize {
    ui.menu_context().selected
}

/// Press Down until `index` of the current menu is selected.
fn navigate_to(ui: &mut TestUi, index: usize) {
    for _ in 0..12 {
        if selected(ui) == index {
            return;
        }
        press(ui, ButtonId::Down);
    }
    panic!("entry {index} not reachable, stuck at {}", selected(ui));
}

fn storage_with(values: &SettingsValues) -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    SettingsBlock::<SettingsValues>::new()
        .save(&mut storage, values)
        .expect("save must succeed");
    storage
}

fn countdown_state(ui: &TestUi) -> Option<CountdownState> {
    let id = ui.registry().side().countdown?;
    match ui.registry().screen(id)? {
        ScreenKind::Countdown(countdown) => Some(countdown.state()),
        _ => None,
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn starts_on_the_stored_screen() {
    let ui = ui();
    assert_eq!(
        ui.menu_context(),
        MenuContext {
            menu: ROOT_MENU,
            selected: HOUR_MIN_BAR,
        }
    );
    assert_eq!(ui.current_screen(), ui.registry().side().default_time);
    assert!(!ui.vertical_scroll().is_active());
}

#[test]
fn up_and_down_walk_the_root_menu_and_wrap() {
    let mut ui = ui();
    press(&mut ui, ButtonId::Down);
    assert_eq!(selected(&ui), HOUR_MIN);
    assert!(ui.vertical_scroll().is_active());
    assert_eq!(ui.settings().selected_screen, 2);

    press(&mut ui, ButtonId::Up);
    press(&mut ui, ButtonId::Up);
    assert_eq!(selected(&ui), HOUR_MIN_SEC);
    press(&mut ui, ButtonId::Up);
    assert_eq!(selected(&ui), OPTIONS);
    press(&mut ui, ButtonId::Down);
    assert_eq!(selected(&ui), HOUR_MIN_SEC);
}

#[test]
fn navigation_skips_unavailable_screens() {
    let mut ui = ui();
    navigate_to(&mut ui, DATE);
    // Temperature needs a hardware clock.
    press(&mut ui, ButtonId::Down);
    assert_eq!(selected(&ui), ALARMS);

    navigate_to(&mut ui, STOPWATCH);
    // Wi-Fi status is hidden on boards without a radio.
    press(&mut ui, ButtonId::Down);
    assert_eq!(selected(&ui), OPTIONS);

    ui.handle_event(ClockEvent::WifiStatus(WifiStatus::Connected));
    press(&mut ui, ButtonId::Up);
    assert_eq!(selected(&ui), WIFI);
}

#[test]
fn vertical_slide_finishes_and_redraws() {
    let mut ui = ui();
    press(&mut ui, ButtonId::Down);
    tick_n(&mut ui, 200);
    assert!(!ui.vertical_scroll().is_active());
    assert_eq!(ui.vertical_scroll().offset(), 0);
}

#[test]
fn submenu_is_entered_with_set_and_left_through_exit() {
    let mut ui = ui();
    navigate_to(&mut ui, ALARMS);
    press(&mut ui, ButtonId::Set);
    // "Skip next alarm" is hidden while no alarm is on.
    assert_eq!(
        ui.menu_context(),
        MenuContext {
            menu: ALARMS_MENU,
            selected: 1,
        }
    );

    press(&mut ui, ButtonId::Down);
    press(&mut ui, ButtonId::Down);
    assert_eq!(selected(&ui), 3);
    press(&mut ui, ButtonId::Set);
    assert_eq!(
        ui.menu_context(),
        MenuContext {
            menu: ROOT_MENU,
            selected: ALARMS,
        }
    );
}

#[test]
fn editing_the_time_walks_hour_then_minute() {
    let mut ui = ui();
    tick_n(&mut ui, 10);

    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 1);
    assert_eq!(ui.edit_state().blink_counter, BLINK_DISAPPEAR_FRAME);

    press(&mut ui, ButtonId::Up);
    assert_eq!(ui.edit_state().blink_counter, 0);
    assert_eq!(ui.engine().now().hour, 1);
    // Up/Down change the value instead of navigating.
    assert_eq!(selected(&ui), HOUR_MIN_BAR);

    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 2);
    hold(&mut ui, ButtonId::Up);
    assert_eq!((ui.engine().now().minute, ui.engine().now().second), (10, 0));
    assert_eq!(ui.engine().tick_count(), 0);

    press(&mut ui, ButtonId::Set);
    assert!(!ui.edit_state().is_editing());
    assert_eq!((ui.engine().now().hour, ui.engine().now().minute), (1, 10));
}

#[test]
fn editing_an_alarm_turns_it_on_and_arms_the_engine() {
    let mut ui = ui();
    navigate_to(&mut ui, ALARMS);
    press(&mut ui, ButtonId::Set);

    // An alarm that is off only offers its mode.
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 1);
    press(&mut ui, ButtonId::Up);
    assert_eq!(ui.settings().alarms[0].mode, AlarmMode::Gradual);

    press(&mut ui, ButtonId::Set);
    press(&mut ui, ButtonId::Up);
    press(&mut ui, ButtonId::Set);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 4);
    // Monday is under the cursor: Down toggles it, Up moves on.
    press(&mut ui, ButtonId::Down);
    press(&mut ui, ButtonId::Up);
    press(&mut ui, ButtonId::Set);
    assert!(!ui.edit_state().is_editing());

    let expected = AlarmConfig::new(AlarmMode::Gradual, 7, 0, WORKDAYS & !0x02);
    assert_eq!(ui.settings().alarms[0], expected);
    assert_eq!(ui.engine().alarms()[0], expected);

    // "Skip next alarm" shows up now that an alarm is on.
    press(&mut ui, ButtonId::Up);
    assert_eq!(selected(&ui), 0);
    press(&mut ui, ButtonId::Set);
    assert!(ui.settings().skip_next_alarm);
}

#[test]
fn alarm_rings_until_any_button_is_pressed() {
    let values = SettingsValues {
        alarms: [
            AlarmConfig::new(AlarmMode::Loud, 7, 0, ALL_WEEKDAYS),
            AlarmConfig::default(),
        ],
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    assert!(ui.engine().is_alarm_on());
    ui.engine_mut().set(&date_time(2024, 3, 6, 6, 59, 59));
    ui.engine_mut().reset_ticks();

    tick_n(&mut ui, FRAMES_PER_SECOND);
    assert_eq!(ui.ringing(), None);
    tick_n(&mut ui, 1);
    assert_eq!(ui.ringing(), Some(AlarmMode::Loud));

    tick_n(&mut ui, FRAMES_PER_SECOND * 2);
    assert_eq!(ui.buzzer().beeps, vec![500, 500]);

    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.ringing(), None);
    // The press only silenced the alarm.
    assert!(!ui.edit_state().is_editing());
    assert_eq!(selected(&ui), HOUR_MIN_BAR);
}

#[test]
fn alarm_switched_off_mid_edit_stays_quiet() {
    let values = SettingsValues {
        alarms: [
            AlarmConfig::new(AlarmMode::Loud, 7, 0, ALL_WEEKDAYS),
            AlarmConfig::default(),
        ],
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    ui.engine_mut().set(&date_time(2024, 3, 6, 6, 59, 58));
    ui.engine_mut().reset_ticks();

    navigate_to(&mut ui, ALARMS);
    press(&mut ui, ButtonId::Set);
    navigate_to(&mut ui, 1);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 1);
    // Loud wraps around to Off; the engine keeps the old mode until editing ends.
    press(&mut ui, ButtonId::Up);
    assert_eq!(ui.settings().alarms[0].mode, AlarmMode::Off);
    assert_eq!(ui.engine().alarms()[0].mode, AlarmMode::Loud);

    tick_n(&mut ui, FRAMES_PER_SECOND * 5);
    assert_eq!(ui.ringing(), None);
    assert!(ui.buzzer().beeps.is_empty());
}

#[test]
fn gradual_alarm_grows_and_gives_up_after_five_minutes() {
    let values = SettingsValues {
        alarms: [
            AlarmConfig::default(),
            AlarmConfig::new(AlarmMode::Gradual, 7, 0, ALL_WEEKDAYS),
        ],
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    ui.engine_mut().set(&date_time(2024, 3, 6, 6, 59, 59));
    ui.engine_mut().reset_ticks();

    tick_n(&mut ui, FRAMES_PER_SECOND * (STOP_RINGING_AFTER_SECS + 3));
    assert_eq!(ui.ringing(), None);
    let expected: Vec<u32> = (1..=STOP_RINGING_AFTER_SECS).collect();
    assert_eq!(ui.buzzer().beeps, expected);
}

#[test]
fn hourly_chime_beeps_on_the_hour() {
    let values = SettingsValues {
        hourly_chime: HourlyChime::On,
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    ui.engine_mut().set(&date_time(2024, 3, 6, 8, 59, 58));
    ui.engine_mut().reset_ticks();

    tick_n(&mut ui, FRAMES_PER_SECOND * 4);
    assert_eq!(ui.buzzer().beeps, vec![100]);
}

#[test]
fn countdown_is_set_run_and_silenced() {
    let mut ui = ui();
    navigate_to(&mut ui, COUNTDOWN);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.menu_context().menu, COUNTDOWN_MENU);
    assert_eq!(ui.current_screen(), ui.registry().side().countdown);

    // "Set" entry: stop, rewind and edit the start value.
    press(&mut ui, ButtonId::Down);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.current_screen(), ui.registry().side().countdown);
    assert_eq!(ui.edit_state().value_index, 1);

    // 01:00 -> 00:00 is stepped over to 00:01.
    press(&mut ui, ButtonId::Down);
    assert_eq!(
        (ui.settings().countdown_start_minute, ui.settings().countdown_start_second),
        (0, 1)
    );
    press(&mut ui, ButtonId::Set);
    press(&mut ui, ButtonId::Set);
    assert!(!ui.edit_state().is_editing());

    press(&mut ui, ButtonId::Set);
    assert_eq!(countdown_state(&ui), Some(CountdownState::Running));

    tick_n(&mut ui, FRAMES_PER_SECOND + 40);
    assert_eq!(countdown_state(&ui), Some(CountdownState::Ringing));
    assert_eq!(ui.buzzer().beeps, vec![50, 50]);

    let before = ui.menu_context();
    press(&mut ui, ButtonId::Up);
    assert_eq!(countdown_state(&ui), Some(CountdownState::Stopped));
    assert_eq!(ui.menu_context(), before);
}

#[test]
fn ringing_countdown_comes_forward() {
    let values = SettingsValues {
        countdown_start_minute: 0,
        countdown_start_second: 2,
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    navigate_to(&mut ui, COUNTDOWN);
    press(&mut ui, ButtonId::Set);
    press(&mut ui, ButtonId::Set);
    assert_eq!(countdown_state(&ui), Some(CountdownState::Running));

    // Leave the countdown menu through its Exit entry and wander off.
    press(&mut ui, ButtonId::Up);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.menu_context().menu, ROOT_MENU);
    press(&mut ui, ButtonId::Down);

    tick_n(&mut ui, FRAMES_PER_SECOND * 2 + 1);
    assert_eq!(countdown_state(&ui), Some(CountdownState::Ringing));
    assert_eq!(ui.menu_context().menu, COUNTDOWN_MENU);
    assert_eq!(ui.current_screen(), ui.registry().side().countdown);
}

#[test]
fn stopwatch_counts_while_running() {
    let mut ui = ui();
    navigate_to(&mut ui, STOPWATCH);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.menu_context().menu, STOPWATCH_MENU);
    press(&mut ui, ButtonId::Set);
    tick_n(&mut ui, FRAMES_PER_SECOND * 2);

    let stopwatch_id = ui.registry().side().stopwatch;
    let elapsed = |ui: &TestUi| match stopwatch_id.and_then(|id| ui.registry().screen(id)) {
        Some(ScreenKind::Stopwatch(stopwatch)) => Some(stopwatch.elapsed()),
        _ => None,
    };
    assert_eq!(elapsed(&ui), Some((0, 2, 0)));

    // Stop, then "Reset".
    press(&mut ui, ButtonId::Set);
    tick_n(&mut ui, FRAMES_PER_SECOND);
    assert_eq!(elapsed(&ui), Some((0, 2, 0)));
    press(&mut ui, ButtonId::Down);
    press(&mut ui, ButtonId::Set);
    assert_eq!(elapsed(&ui), Some((0, 0, 0)));
    assert_eq!(ui.current_screen(), stopwatch_id);
}

#[test]
fn options_are_saved_after_the_write_delay_and_restored() {
    let mut ui = ui();
    navigate_to(&mut ui, OPTIONS);
    press(&mut ui, ButtonId::Set);
    press(&mut ui, ButtonId::Set);
    assert_eq!(ui.edit_state().value_index, 2);
    press(&mut ui, ButtonId::Up);
    assert!(!ui.settings().format_24h);
    for _ in 0..6 {
        press(&mut ui, ButtonId::Set);
    }
    assert!(!ui.edit_state().is_editing());

    tick_n(&mut ui, WRITE_DELAY_FRAMES - 1);
    assert_eq!(ui.storage().write_count(), 0);
    tick_n(&mut ui, 1);
    assert_eq!(ui.storage().write_count(), 1);

    let restored = ui_with_storage(ui.storage().clone());
    assert!(!restored.settings().format_24h);
    assert_eq!(restored.menu_context().selected, OPTIONS);
}

#[test]
fn corrupted_settings_fall_back_to_defaults() {
    let mut storage = storage_with(&SettingsValues {
        format_24h: false,
        ..SettingsValues::default()
    });
    storage.bytes_mut()[12] ^= 0xFF;
    let ui = ui_with_storage(storage);
    assert_eq!(*ui.settings(), SettingsValues::default());
}

#[test]
fn daylight_brightness_interpolates_between_dim_and_bright() {
    let ui = ui();
    assert!(ui.is_day_light());
    // Halfway between the dim threshold and full daylight.
    assert_close(ui.display().brightness(), 75.0);
}

#[test]
fn dark_room_boost_fades_after_idle_seconds() {
    let mut ui = ui();
    for _ in 0..32 {
        ui.display_mut().feed_ambient_light(5.0);
    }
    tick_n(&mut ui, 1);
    assert!(!ui.is_day_light());
    assert_close(ui.display().brightness(), 37.5);

    tick_n(&mut ui, FRAMES_PER_SECOND * 6);
    assert_close(ui.display().brightness(), 17.5);

    press(&mut ui, ButtonId::Up);
    tick_n(&mut ui, 1);
    assert_close(ui.display().brightness(), 37.5);
}

#[test]
fn manual_brightness_ignores_the_light_sensor() {
    let values = SettingsValues {
        auto_light: false,
        manual_brightness: 40,
        ..SettingsValues::default()
    };
    let ui = ui_with_storage(storage_with(&values));
    assert_close(ui.display().brightness(), 40.0);
}

#[test]
fn auto_scroll_cycles_time_and_date_when_idle() {
    let values = SettingsValues {
        auto_scroll: true,
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    ui.engine_mut().set(&date_time(2024, 3, 6, 12, 0, 0));
    ui.engine_mut().reset_ticks();

    tick_n(&mut ui, FRAMES_PER_SECOND * 20);
    assert_eq!(ui.seconds_without_input(), 20);
    assert_eq!(selected(&ui), DATE);

    // Without a hardware clock there is no temperature: back to the time.
    tick_n(&mut ui, FRAMES_PER_SECOND * 20);
    assert_eq!(selected(&ui), HOUR_MIN_BAR);

    press(&mut ui, ButtonId::Down);
    assert_eq!(ui.seconds_without_input(), 0);
}

#[test]
fn network_time_from_the_inbox_is_applied_on_the_next_frame() {
    let inbox = ClockInbox::new();
    let mut ui = ui();
    // 2024-03-06 10:00:00 UTC
    inbox
        .post(ClockEvent::NetworkTime(NtpTime {
            utc: UnixSeconds(1_709_719_200),
            millis: 0,
        }))
        .expect("inbox has room");
    inbox
        .post(ClockEvent::Button(ButtonEvent::pressed(ButtonId::Down)))
        .expect("inbox has room");

    ui.process_inbox(&inbox);
    assert_eq!(ui.engine().now().year, 2024);
    assert_eq!(ui.engine().now().hour, 10);
    assert_eq!(selected(&ui), HOUR_MIN);
}

#[test]
fn time_screen_lights_pixels() {
    let mut ui = ui();
    ui.engine_mut().set(&date_time(2024, 3, 6, 12, 34, 56));
    tick_n(&mut ui, 1);
    let lit = ui
        .display()
        .bitmap()
        .rows()
        .iter()
        .map(|row| row.count_ones())
        .sum::<u32>();
    assert!(lit > 10, "only {lit} pixels lit");
}

#[test]
fn alarm_indicator_follows_the_engine() {
    let values = SettingsValues {
        alarms: [
            AlarmConfig::new(AlarmMode::Loud, 7, 0, ALL_WEEKDAYS),
            AlarmConfig::default(),
        ],
        ..SettingsValues::default()
    };
    let mut ui = ui_with_storage(storage_with(&values));
    tick_n(&mut ui, 1);
    let (row, mask) = Indicator::AlarmOn.location();
    assert_eq!(ui.display().bitmap().rows()[row] & mask, mask);
    assert_eq!(ui.engine().alarms()[AlarmId::First.index()].hour, 7);
}
