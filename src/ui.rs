//! The UI tick orchestrator.
//!
//! [`ClockUi`] owns the time engine, the settings, the screens and the display, and runs one
//! fixed sequence per frame:
//!
//! 1. advance the engine and the countdown/stopwatch
//! 2. redraw everything if the time jumped, start ringing if an alarm fired
//! 3. set the display brightness from the ambient light
//! 4. once per second: alarm beeps or the hourly chime, then auto scroll
//! 5. render the current screen (through the vertical slide if one is running) and the
//!    status indicators
//! 6. advance the edit blink, write the settings when their write delay has passed
//!
//! Button presses and network time arrive through [`ClockUi::handle_event`], normally by
//! draining a [`ClockInbox`] at the start of a frame.

use core::mem;

use heapless::Vec;

use crate::{
    alarm::AlarmMode,
    bitmap::{Bitmap, Indicator},
    button::{ButtonEvent, ButtonId, PressKind},
    cyclic_counter::CyclicCounter,
    display::Display,
    engine::TimeEngine,
    field_editor::Direction,
    inbox::{ClockEvent, ClockInbox},
    rtc::HardwareClock,
    screens::{
        EditState, MAX_REQUESTS, MenuId, NO_EDITING, ROOT_MENU, Screen, ScreenContext, ScreenId,
        ScreenKind, ScreenRegistry, UiRequest,
    },
    scroll::{HorizontalScroll, Slide, VerticalScroll},
    settings::{HourlyChime, Settings, SettingsValues},
    settings_block::{SettingsBlock, SettingsStorage},
    shared_constants::{
        AUTO_SCROLL_IDLE_SECS, BRIGHTNESS_BOOST_AFTER_INPUT_SECS, BRIGHTNESS_BOOST_PERCENT,
        DIM_AMBIENT_LIGHT, FRAME_RATE, HOURLY_CHIME_BEEP_MS, LOUD_ALARM_BEEP_MS,
        STOP_RINGING_AFTER_SECS,
    },
    sound::Buzzer,
    wifi_status::WifiStatus,
};

/// Rounds of follow-up requests applied before giving up on a request loop.
const MAX_REQUEST_ROUNDS: usize = 8;

/// Which menu is shown and which of its entries is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuContext {
    pub menu: MenuId,
    pub selected: usize,
}

/// The parts of the clock a screen can reach through its [`ScreenContext`].
struct Core<R, B> {
    engine: TimeEngine<R>,
    settings: Settings,
    scroll: HorizontalScroll,
    buzzer: B,
    wifi_status: WifiStatus,
    requests: Vec<UiRequest, MAX_REQUESTS>,
}

impl<R: HardwareClock, B: Buzzer> Core<R, B> {
    fn context(&mut self, self_id: ScreenId) -> ScreenContext<'_, R> {
        ScreenContext::new(
            &mut self.engine,
            &mut self.settings,
            &mut self.scroll,
            &mut self.buzzer,
            self.wifi_status,
            self_id,
            &mut self.requests,
        )
    }
}

/// The clock's user interface.
pub struct ClockUi<R, D, B, S> {
    core: Core<R, B>,
    registry: ScreenRegistry,
    display: D,
    storage: S,
    settings_block: SettingsBlock<SettingsValues>,
    menu: MenuContext,
    edited_value_index: u8,
    blink: CyclicCounter,
    vertical_scroll: VerticalScroll,
    force_refresh: bool,
    seconds_without_input: u32,
    day_light: bool,
    ringing: Option<AlarmMode>,
    ringing_for_secs: u32,
    last_time_screen: Option<ScreenId>,
}

impl<R, D, B, S> ClockUi<R, D, B, S>
where
    R: HardwareClock,
    D: Display,
    B: Buzzer,
    S: SettingsStorage,
{
    /// Build the UI, restoring the settings stored in `storage`.
    ///
    /// Missing or unreadable settings fall back to the defaults.
    pub fn new(mut engine: TimeEngine<R>, display: D, buzzer: B, mut storage: S) -> Self {
        let settings_block = SettingsBlock::new();
        let values = match settings_block.load(&mut storage) {
            Ok(Some(values)) => {
                info!("Settings restored");
                values
            }
            Ok(None) => SettingsValues::default(),
            Err(err) => {
                warn!("Settings unreadable ({}), using defaults", err);
                SettingsValues::default()
            }
        };
        for id in crate::alarm::AlarmId::ALL {
            engine.set_alarm(id, *values.alarm(id));
        }

        let mut registry = ScreenRegistry::standard();
        if let Some(countdown) = registry.countdown_mut() {
            countdown.reload(&values);
        }
        let root_len = registry.menu_len(ROOT_MENU);
        let selected = usize::from(values.selected_screen).min(root_len.saturating_sub(1));
        let default_time = registry.side().default_time;

        let mut ui = Self {
            core: Core {
                engine,
                settings: Settings::new(values),
                scroll: HorizontalScroll::new(),
                buzzer,
                wifi_status: WifiStatus::NotAvailable,
                requests: Vec::new(),
            },
            registry,
            display,
            storage,
            settings_block,
            menu: MenuContext {
                menu: ROOT_MENU,
                selected,
            },
            edited_value_index: NO_EDITING,
            blink: CyclicCounter::starting_at(FRAME_RATE, -1),
            vertical_scroll: VerticalScroll::new(),
            force_refresh: true,
            seconds_without_input: 0,
            day_light: false,
            ringing: None,
            ringing_for_secs: 0,
            last_time_screen: default_time,
        };

        ui.settle_on_available();
        if let Some(current) = ui.current_screen() {
            if ui.is_time_function(current) {
                ui.last_time_screen = Some(current);
            }
            ui.with_screen(current, |screen, ctx| screen.on_select(ctx));
        }
        ui.apply_requests();
        ui.adjust_brightness();
        ui
    }

    /// Handle every event waiting in `inbox`.
    pub fn process_inbox(&mut self, inbox: &ClockInbox) {
        for event in inbox.drain() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: ClockEvent) {
        match event {
            ClockEvent::Button(button) => self.on_button(button),
            ClockEvent::NetworkTime(time) => {
                self.core.engine.apply_network_time(time.utc, time.millis);
            }
            ClockEvent::NetworkTimeFailed(reason) => {
                warn!("Network time failed: {:?}", reason);
            }
            ClockEvent::WifiStatus(status) => {
                if status != self.core.wifi_status {
                    info!("Wifi status: {:?}", status);
                    self.core.wifi_status = status;
                    self.force_refresh = true;
                }
            }
            ClockEvent::SecondElapsed => self.on_second(),
        }
    }

    /// The slow once-per-second work that does not fit in a frame.
    pub fn on_second(&mut self) {
        self.core.engine.sample_temperature();
    }

    /// Run one frame.
    pub fn tick(&mut self) {
        let outcome = self.core.engine.tick(&mut self.core.settings);
        let side = *self.registry.side();
        for id in [side.countdown, side.stopwatch].into_iter().flatten() {
            self.with_screen(id, |screen, ctx| screen.tick(ctx));
        }
        self.apply_requests();

        if outcome.time_adjusted {
            self.force_refresh = true;
        }
        if let Some(id) = outcome.fired_alarm {
            // The engine only learns about edits when they finish; the stored mode wins.
            let mode = self.core.settings.get().alarm(id).mode;
            if mode == AlarmMode::Off {
                info!("Alarm {:?} switched off while editing, not ringing", id);
            } else {
                info!("Ringing {:?}", mode);
                self.ringing = Some(mode);
                self.ringing_for_secs = 0;
            }
        }

        self.adjust_brightness();
        if self.core.engine.tick_count() == 0 {
            self.on_second_boundary();
        }

        self.render();
        self.core.buzzer.tick();

        if self.core.settings.tick() {
            self.save_settings();
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &TimeEngine<R> {
        &self.core.engine
    }

    pub const fn engine_mut(&mut self) -> &mut TimeEngine<R> {
        &mut self.core.engine
    }

    #[must_use]
    pub const fn settings(&self) -> &SettingsValues {
        self.core.settings.get()
    }

    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    #[must_use]
    pub const fn buzzer(&self) -> &B {
        &self.core.buzzer
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn menu_context(&self) -> MenuContext {
        self.menu
    }

    #[must_use]
    pub fn current_screen(&self) -> Option<ScreenId> {
        self.registry.entry(self.menu.menu, self.menu.selected)
    }

    #[must_use]
    pub const fn edit_state(&self) -> EditState {
        EditState {
            value_index: self.edited_value_index,
            blink_counter: self.blink.value(),
        }
    }

    #[must_use]
    pub const fn vertical_scroll(&self) -> &VerticalScroll {
        &self.vertical_scroll
    }

    #[must_use]
    pub const fn horizontal_scroll(&self) -> &HorizontalScroll {
        &self.core.scroll
    }

    /// Mode of the alarm currently ringing.
    #[must_use]
    pub const fn ringing(&self) -> Option<AlarmMode> {
        self.ringing
    }

    #[must_use]
    pub const fn seconds_without_input(&self) -> u32 {
        self.seconds_without_input
    }

    #[must_use]
    pub const fn is_day_light(&self) -> bool {
        self.day_light
    }

    fn on_button(&mut self, event: ButtonEvent) {
        let direction = match (event.button, event.kind) {
            (ButtonId::Set, PressKind::Pressed) => return self.on_set_button(),
            (ButtonId::Set, PressKind::Repeated) => return,
            (ButtonId::Up, PressKind::Pressed) => Direction::Up,
            (ButtonId::Up, PressKind::Repeated) => Direction::RepeatedUp,
            (ButtonId::Down, PressKind::Pressed) => Direction::Down,
            (ButtonId::Down, PressKind::Repeated) => Direction::RepeatedDown,
        };
        self.on_up_or_down(direction);
    }

    /// Any press silences a ringing alarm or countdown and does nothing else.
    fn on_any_button_touched(&mut self) -> bool {
        self.seconds_without_input = 0;
        if self.ringing.take().is_some() {
            info!("Alarm silenced");
            return true;
        }
        self.registry
            .countdown_mut()
            .is_some_and(|countdown| countdown.stop_ringing())
    }

    fn on_set_button(&mut self) {
        if self.on_any_button_touched() {
            return;
        }
        let Some(current) = self.current_screen() else {
            return;
        };
        let edit = self.edit_state();
        self.with_screen(current, |screen, ctx| screen.activate(edit, ctx));
        self.apply_requests();
    }

    fn on_up_or_down(&mut self, direction: Direction) {
        if self.on_any_button_touched() {
            return;
        }
        let Some(current) = self.current_screen() else {
            return;
        };

        if self.edited_value_index != NO_EDITING {
            let index = self.edited_value_index;
            self.with_screen(current, |screen, ctx| screen.modify_value(index, direction, ctx));
            // Show the new value at once.
            self.blink.set(0);
            self.core.scroll.bring_to_right();
            self.apply_requests();
            return;
        }

        self.skip_unavailable(direction);
        let Some(selected) = self.current_screen() else {
            return;
        };
        if self.menu.menu == ROOT_MENU {
            self.core.settings.modify().selected_screen =
                u8::try_from(self.menu.selected).unwrap_or(0);
            if self.is_time_function(selected) {
                self.last_time_screen = Some(selected);
            }
        }
        self.core.scroll.reset();
        self.with_screen(selected, |screen, ctx| screen.on_select(ctx));
        self.apply_requests();
    }

    /// Step once in `direction`, then on past unavailable screens, sliding the display.
    fn skip_unavailable(&mut self, direction: Direction) {
        let len = self.registry.menu_len(self.menu.menu);
        if len == 0 {
            return;
        }
        for _ in 0..len {
            if direction.is_up() {
                self.menu.selected = self.menu.selected.checked_sub(1).unwrap_or(len - 1);
                self.vertical_scroll.start(Slide::FromTop);
            } else {
                self.menu.selected = (self.menu.selected + 1) % len;
                self.vertical_scroll.start(Slide::FromBottom);
            }
            if self.current_is_available() {
                return;
            }
        }
    }

    /// Move the selection forward to the first available screen, without sliding.
    fn settle_on_available(&mut self) {
        let len = self.registry.menu_len(self.menu.menu);
        for _ in 0..len {
            if self.current_is_available() {
                return;
            }
            self.menu.selected = (self.menu.selected + 1) % len;
        }
    }

    fn current_is_available(&mut self) -> bool {
        self.current_screen()
            .and_then(|id| self.with_screen(id, |screen, ctx| screen.is_available(ctx)))
            .unwrap_or(false)
    }

    fn is_time_function(&self, id: ScreenId) -> bool {
        self.registry
            .screen(id)
            .is_some_and(|screen| Screen::<R>::is_time_function(screen))
    }

    fn edit_next_value(&mut self) {
        let Some(current) = self.current_screen() else {
            return;
        };
        let count = self
            .registry
            .screen(current)
            .map_or(0, |screen| Screen::<R>::value_count(screen, self.core.settings.get()));

        self.edited_value_index = self.edited_value_index.saturating_add(1);
        self.core.scroll.reset();
        if self.edited_value_index <= count {
            let index = self.edited_value_index;
            debug!("Editing value {}", index);
            self.with_screen(current, |screen, ctx| screen.start_editing_value(index, ctx));
        } else {
            self.stop_editing(current);
        }
        self.force_refresh = true;
    }

    fn stop_editing(&mut self, screen_id: ScreenId) {
        debug!("Editing finished");
        self.edited_value_index = NO_EDITING;
        self.blink.stop();
        self.with_screen(screen_id, |screen, ctx| screen.finish_editing(ctx));
    }

    fn enter_menu(&mut self, menu: MenuId, select: Option<ScreenId>) {
        // Leaving the screen ends any edit in progress on it.
        if self.edited_value_index != NO_EDITING {
            if let Some(current) = self.current_screen() {
                self.stop_editing(current);
            }
        }

        self.menu = MenuContext { menu, selected: 0 };
        self.force_refresh = true;
        self.core.scroll.reset();
        self.settle_on_available();
        if let Some(position) = select
            .and_then(|id| self.registry.menu(menu).and_then(|menu| menu.position(id)))
        {
            self.menu.selected = position;
        }
        if let Some(current) = self.current_screen() {
            self.with_screen(current, |screen, ctx| screen.on_select(ctx));
        }
    }

    fn exit_menu(&mut self) {
        match self.registry.menu(self.menu.menu).and_then(|menu| menu.parent) {
            Some((parent, entry)) => self.enter_menu(parent, Some(entry)),
            None => warn!("Already in the root menu"),
        }
    }

    /// Select `id` if it belongs to the current menu.
    fn select_screen(&mut self, id: ScreenId) {
        if let Some(position) = self
            .registry
            .menu(self.menu.menu)
            .and_then(|menu| menu.position(id))
        {
            self.menu.selected = position;
        }
        self.force_refresh = true;
    }

    fn apply_requests(&mut self) {
        for _ in 0..MAX_REQUEST_ROUNDS {
            let requests = mem::take(&mut self.core.requests);
            if requests.is_empty() {
                return;
            }
            for request in requests {
                self.apply_request(request);
            }
        }
        warn!("UI requests did not settle, dropping the rest");
        self.core.requests.clear();
    }

    fn apply_request(&mut self, request: UiRequest) {
        match request {
            UiRequest::EditNextValue => self.edit_next_value(),
            UiRequest::SetBlinkCounter(counter) => self.blink.set(counter),
            UiRequest::ForceRefresh => self.force_refresh = true,
            UiRequest::BringScrollingToRight => self.core.scroll.bring_to_right(),
            UiRequest::EnterMenu { menu, select } => self.enter_menu(menu, select),
            UiRequest::ExitMenu => self.exit_menu(),
            UiRequest::SelectScreen(id) => self.select_screen(id),
            UiRequest::SetCountdown => {
                let values = *self.core.settings.get();
                if let Some(countdown) = self.registry.countdown_mut() {
                    countdown.set(&values);
                }
                if let Some(id) = self.registry.side().countdown {
                    self.select_screen(id);
                    self.edit_next_value();
                }
            }
            UiRequest::ResetStopwatch => {
                if let Some(stopwatch) = self.registry.stopwatch_mut() {
                    stopwatch.reset();
                }
                if let Some(id) = self.registry.side().stopwatch {
                    self.select_screen(id);
                }
            }
        }
    }

    /// Call `f` on screen `id` with a fresh context. Requests it makes stay queued.
    fn with_screen<T>(
        &mut self,
        id: ScreenId,
        f: impl FnOnce(&mut ScreenKind, &mut ScreenContext<'_, R>) -> T,
    ) -> Option<T> {
        let screen = self.registry.screen_mut(id)?;
        let mut ctx = self.core.context(id);
        Some(f(screen, &mut ctx))
    }

    fn hourly_chime_active(&self) -> bool {
        match self.core.settings.get().hourly_chime {
            HourlyChime::Off => false,
            HourlyChime::On => true,
            HourlyChime::DaylightOnly => self.day_light,
        }
    }

    fn adjust_brightness(&mut self) {
        let ambient = self.display.ambient_light();
        self.day_light = ambient >= DIM_AMBIENT_LIGHT;
        let values = *self.core.settings.get();

        let brightness = if !values.auto_light {
            f32::from(values.manual_brightness)
        } else if self.day_light {
            let dim = f32::from(values.brightness_dim);
            let bright = f32::from(values.brightness_bright);
            dim + (ambient - DIM_AMBIENT_LIGHT) * (bright - dim) / (100.0 - DIM_AMBIENT_LIGHT)
        } else {
            let dark = f32::from(values.brightness_dark);
            let dim = f32::from(values.brightness_dim);
            let brightness = dark + ambient * (dim - dark) / DIM_AMBIENT_LIGHT;
            if self.seconds_without_input < BRIGHTNESS_BOOST_AFTER_INPUT_SECS
                && self.current_allows_boost()
            {
                (brightness + BRIGHTNESS_BOOST_PERCENT).min(dim)
            } else {
                brightness
            }
        };
        self.display.set_brightness(brightness.clamp(0.0, 100.0));
    }

    fn current_allows_boost(&self) -> bool {
        let index = self.edited_value_index;
        self.current_screen()
            .and_then(|id| self.registry.screen(id))
            .is_none_or(|screen| Screen::<R>::allows_brightness_boost(screen, index))
    }

    fn on_second_boundary(&mut self) {
        let now = *self.core.engine.now();
        if let Some(mode) = self.ringing {
            self.ringing_for_secs += 1;
            let duration_ms = match mode {
                AlarmMode::Gradual => self.ringing_for_secs,
                AlarmMode::Loud => LOUD_ALARM_BEEP_MS,
                AlarmMode::Off => 0,
            };
            self.core.buzzer.beep_for_ms(duration_ms);
            if self.ringing_for_secs >= STOP_RINGING_AFTER_SECS {
                info!("Alarm stopped ringing");
                self.ringing = None;
            }
        } else if self.hourly_chime_active() && now.minute == 0 && now.second == 0 {
            debug!("Hourly chime");
            self.core.buzzer.beep_for_ms(HOURLY_CHIME_BEEP_MS);
        }

        self.seconds_without_input = self.seconds_without_input.saturating_add(1);
        if self.core.settings.get().auto_scroll
            && self.edited_value_index == NO_EDITING
            && self.menu.menu == ROOT_MENU
            && self.seconds_without_input >= AUTO_SCROLL_IDLE_SECS
        {
            self.auto_scroll(now.second);
        }
    }

    /// Cycle time, date and temperature (time again without a hardware clock).
    fn auto_scroll(&mut self, second: u8) {
        let side = *self.registry.side();
        let target = match u32::from(second) {
            0 => self.last_time_screen,
            AUTO_SCROLL_IDLE_SECS => side.date,
            second if second == AUTO_SCROLL_IDLE_SECS * 2 => {
                if self.core.engine.has_hardware_clock() {
                    side.temperature
                } else {
                    self.last_time_screen
                }
            }
            _ => None,
        };
        let Some(position) = target.and_then(|id| {
            self.registry
                .menu(ROOT_MENU)
                .and_then(|menu| menu.position(id))
        }) else {
            return;
        };
        self.menu.selected = position;
        self.vertical_scroll.start(Slide::FromBottom);
    }

    fn render(&mut self) {
        let Some(current) = self.current_screen() else {
            return;
        };
        let edit = self.edit_state();

        if self.vertical_scroll.advance() {
            self.force_refresh = true;
        }

        if self.vertical_scroll.offset() != 0 {
            if self.vertical_scroll.is_compose_frame() {
                let mut incoming = Bitmap::new();
                if let Some(screen) = self.registry.screen_mut(current) {
                    let mut ctx = self.core.context(current);
                    screen.render_frame(&mut incoming, edit, true, &mut ctx);
                }
                self.vertical_scroll
                    .compose(self.display.frame(), &incoming);
            }
        } else if !self.vertical_scroll.is_active() {
            let full_refresh = self.force_refresh;
            if let Some(screen) = self.registry.screen_mut(current) {
                let mut ctx = self.core.context(current);
                screen.render_frame(self.display.frame(), edit, full_refresh, &mut ctx);
            }
        }

        self.render_indicators();
        if self.edited_value_index != NO_EDITING {
            self.blink.increment();
        }
        self.force_refresh = false;
        self.apply_requests();
    }

    fn render_indicators(&mut self) {
        let values = *self.core.settings.get();
        let hourly = self.hourly_chime_active();
        let alarm_on = self.core.engine.is_alarm_on()
            && (!values.skip_next_alarm || self.core.engine.now().second % 2 != 0);

        let frame = self.display.frame();
        frame.put_indicator(Indicator::MoveOn, values.auto_scroll);
        frame.put_indicator(Indicator::Hourly, hourly);
        frame.put_indicator(Indicator::AutoLight, values.auto_light);
        frame.put_indicator(Indicator::AlarmOn, alarm_on);
    }

    fn save_settings(&mut self) {
        match self
            .settings_block
            .save(&mut self.storage, self.core.settings.get())
        {
            Ok(()) => info!("Settings saved"),
            Err(err) => warn!("Settings not saved: {}", err),
        }
    }
}
