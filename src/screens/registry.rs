use heapless::Vec;

use super::{
    ActionKind, ActionScreen, AlarmScreen, CountdownScreen, DateScreen, OptionsScreen,
    ScreenKind, SkipNextAlarmScreen, StopwatchScreen, SubmenuScreen, TemperatureScreen,
    TimeScreen, TimeStyle, WifiStatusScreen,
};
use crate::{alarm::AlarmId, ui_texts};

pub const MAX_SCREENS: usize = 24;
pub const MAX_MENUS: usize = 4;
pub const MAX_MENU_ENTRIES: usize = 12;

/// Index of a screen in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenId(pub u8);

/// Index of a menu in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuId(pub u8);

pub const ROOT_MENU: MenuId = MenuId(0);

/// An ordered list of screens navigated with Up/Down.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    pub entries: Vec<ScreenId, MAX_MENU_ENTRIES>,
    /// The menu this one was entered from, and the submenu screen that entered it.
    pub parent: Option<(MenuId, ScreenId)>,
}

impl Menu {
    #[must_use]
    pub fn position(&self, screen: ScreenId) -> Option<usize> {
        self.entries.iter().position(|entry| *entry == screen)
    }
}

/// Screens the orchestrator addresses directly rather than through a menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SideTable {
    pub countdown: Option<ScreenId>,
    pub stopwatch: Option<ScreenId>,
    pub date: Option<ScreenId>,
    pub temperature: Option<ScreenId>,
    /// Time screen auto scroll falls back to when none was chosen yet.
    pub default_time: Option<ScreenId>,
}

/// Owner of every screen and menu.
#[derive(Clone, Debug, Default)]
pub struct ScreenRegistry {
    screens: Vec<ScreenKind, MAX_SCREENS>,
    menus: Vec<Menu, MAX_MENUS>,
    side: SideTable,
}

impl ScreenRegistry {
    /// The clock's menu tree.
    ///
    /// Root: three time styles, date, temperature, then the alarm, countdown and stopwatch
    /// submenus, Wi-Fi status and options. Each submenu ends with an Exit entry.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::default();
        let root = registry.add_menu(None);

        registry.add_to(root, ScreenKind::Time(TimeScreen::new(TimeStyle::HourMinSec)));
        let hour_min_bar =
            registry.add_to(root, ScreenKind::Time(TimeScreen::new(TimeStyle::HourMinBar)));
        registry.add_to(root, ScreenKind::Time(TimeScreen::new(TimeStyle::HourMin)));
        let date = registry.add_to(root, ScreenKind::Date(DateScreen));
        let temperature = registry.add_to(root, ScreenKind::Temperature(TemperatureScreen));

        let alarms_entry = registry.next_id();
        let alarms = registry.add_menu(Some((root, alarms_entry)));
        registry.add_to(
            root,
            ScreenKind::Submenu(SubmenuScreen::alarms(ui_texts::ALARMS, alarms)),
        );

        let countdown_entry = registry.next_id();
        let countdown_menu = registry.add_menu(Some((root, countdown_entry)));
        registry.add_to(
            root,
            ScreenKind::Submenu(SubmenuScreen::new(ui_texts::COUNTDOWN, countdown_menu)),
        );

        let stopwatch_entry = registry.next_id();
        let stopwatch_menu = registry.add_menu(Some((root, stopwatch_entry)));
        registry.add_to(
            root,
            ScreenKind::Submenu(SubmenuScreen::new(ui_texts::STOPWATCH, stopwatch_menu)),
        );

        registry.add_to(root, ScreenKind::WifiStatus(WifiStatusScreen));
        registry.add_to(root, ScreenKind::Options(OptionsScreen));

        registry.add_to(alarms, ScreenKind::SkipNextAlarm(SkipNextAlarmScreen));
        registry.add_to(alarms, ScreenKind::Alarm(AlarmScreen::new(AlarmId::First)));
        registry.add_to(alarms, ScreenKind::Alarm(AlarmScreen::new(AlarmId::Second)));
        registry.add_to(alarms, ScreenKind::Action(ActionScreen::new(ActionKind::ExitMenu)));

        let countdown = registry.add_to(
            countdown_menu,
            ScreenKind::Countdown(CountdownScreen::new(countdown_menu)),
        );
        registry.add_to(
            countdown_menu,
            ScreenKind::Action(ActionScreen::new(ActionKind::SetCountdown)),
        );
        registry.add_to(
            countdown_menu,
            ScreenKind::Action(ActionScreen::new(ActionKind::ExitMenu)),
        );

        let stopwatch =
            registry.add_to(stopwatch_menu, ScreenKind::Stopwatch(StopwatchScreen::new()));
        registry.add_to(
            stopwatch_menu,
            ScreenKind::Action(ActionScreen::new(ActionKind::ResetStopwatch)),
        );
        registry.add_to(
            stopwatch_menu,
            ScreenKind::Action(ActionScreen::new(ActionKind::ExitMenu)),
        );

        registry.side = SideTable {
            countdown: Some(countdown),
            stopwatch: Some(stopwatch),
            date: Some(date),
            temperature: Some(temperature),
            default_time: Some(hour_min_bar),
        };
        registry
    }

    /// Add a menu; returns its id.
    pub fn add_menu(&mut self, parent: Option<(MenuId, ScreenId)>) -> MenuId {
        let id = MenuId(u8::try_from(self.menus.len()).unwrap_or(u8::MAX));
        if self.menus.push(Menu { entries: Vec::new(), parent }).is_err() {
            error!("Too many menus");
        }
        id
    }

    /// Add a screen at the end of `menu`; returns its id.
    pub fn add_to(&mut self, menu: MenuId, screen: ScreenKind) -> ScreenId {
        let id = self.next_id();
        if self.screens.push(screen).is_err() {
            error!("Too many screens");
            return id;
        }
        match self.menus.get_mut(usize::from(menu.0)) {
            Some(menu) => {
                if menu.entries.push(id).is_err() {
                    error!("Too many menu entries");
                }
            }
            None => error!("No menu {}", menu.0),
        }
        id
    }

    #[must_use]
    pub fn screen(&self, id: ScreenId) -> Option<&ScreenKind> {
        self.screens.get(usize::from(id.0))
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> Option<&mut ScreenKind> {
        self.screens.get_mut(usize::from(id.0))
    }

    #[must_use]
    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(usize::from(id.0))
    }

    /// The screen at `index` of `menu`.
    #[must_use]
    pub fn entry(&self, menu: MenuId, index: usize) -> Option<ScreenId> {
        self.menu(menu)?.entries.get(index).copied()
    }

    #[must_use]
    pub fn menu_len(&self, menu: MenuId) -> usize {
        self.menu(menu).map_or(0, |menu| menu.entries.len())
    }

    #[must_use]
    pub const fn side(&self) -> &SideTable {
        &self.side
    }

    pub fn countdown_mut(&mut self) -> Option<&mut CountdownScreen> {
        match self.screen_mut(self.side.countdown?)? {
            ScreenKind::Countdown(countdown) => Some(countdown),
            _ => None,
        }
    }

    pub fn stopwatch_mut(&mut self) -> Option<&mut StopwatchScreen> {
        match self.screen_mut(self.side.stopwatch?)? {
            ScreenKind::Stopwatch(stopwatch) => Some(stopwatch),
            _ => None,
        }
    }

    fn next_id(&self) -> ScreenId {
        ScreenId(u8::try_from(self.screens.len()).unwrap_or(u8::MAX))
    }
}
