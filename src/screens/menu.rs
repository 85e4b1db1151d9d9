use core::fmt::Write as _;

use heapless::String;

use super::{EditState, MenuId, Screen, ScreenContext, UiRequest};
use crate::{
    alarm::NextAlarm, bitmap::Bitmap, rtc::HardwareClock, ui_texts, wifi_status::WifiStatus,
};

/// Entry point of a submenu. Set enters it.
#[derive(Clone, Debug)]
pub struct SubmenuScreen {
    label: &'static str,
    menu: MenuId,
    shows_next_alarm: bool,
    next_alarm: Option<NextAlarm>,
}

impl SubmenuScreen {
    #[must_use]
    pub const fn new(label: &'static str, menu: MenuId) -> Self {
        Self {
            label,
            menu,
            shows_next_alarm: false,
            next_alarm: None,
        }
    }

    /// A submenu whose label announces the next alarm that will ring.
    #[must_use]
    pub const fn alarms(label: &'static str, menu: MenuId) -> Self {
        Self {
            shows_next_alarm: true,
            ..Self::new(label, menu)
        }
    }

    #[must_use]
    pub const fn menu(&self) -> MenuId {
        self.menu
    }

    /// Next alarm as computed when the screen was last selected.
    #[must_use]
    pub const fn next_alarm(&self) -> Option<NextAlarm> {
        self.next_alarm
    }
}

impl<R: HardwareClock> Screen<R> for SubmenuScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let mut text = String::<48>::new();
        let _ = text.push_str(self.label);
        let next_alarm = self.next_alarm.filter(|_| ctx.engine.is_alarm_on());
        let mut morning = true;
        if let Some(next) = next_alarm {
            let (hour, is_morning) = ctx.convert_hour(next.time.hour);
            morning = is_morning;
            let _ = write!(
                text,
                " ({}{}:{:02})",
                ui_texts::NEXT_COLON,
                hour,
                next.time.minute
            );
        }
        ctx.render_scrolling_text(frame, full_refresh, edit, &text, "", "");

        if let Some(next) = next_alarm {
            ctx.put_am_pm_indicators(frame, morning);
            frame.put_week_day(next.weekday, true);
        }
    }

    fn activate(&mut self, _edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        ctx.request(UiRequest::EnterMenu {
            menu: self.menu,
            select: None,
        });
    }

    fn on_select(&mut self, ctx: &mut ScreenContext<'_, R>) {
        if self.shows_next_alarm {
            self.next_alarm = ctx.engine.next_alarm(ctx.values().skip_next_alarm);
        }
    }
}

/// What an action entry does when Set is pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionKind {
    /// Leave the submenu.
    ExitMenu,
    /// Stop the countdown and edit its start value.
    SetCountdown,
    ResetStopwatch,
}

/// A labelled entry that performs one action.
#[derive(Clone, Debug)]
pub struct ActionScreen {
    kind: ActionKind,
}

impl ActionScreen {
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    const fn label(&self) -> &'static str {
        match self.kind {
            ActionKind::ExitMenu => ui_texts::EXIT,
            ActionKind::SetCountdown => ui_texts::SET,
            ActionKind::ResetStopwatch => ui_texts::RESET,
        }
    }
}

impl<R: HardwareClock> Screen<R> for ActionScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        ctx.render_scrolling_text(frame, full_refresh, edit, self.label(), "", "");
    }

    fn activate(&mut self, _edit: EditState, ctx: &mut ScreenContext<'_, R>) {
        ctx.request(match self.kind {
            ActionKind::ExitMenu => UiRequest::ExitMenu,
            ActionKind::SetCountdown => UiRequest::SetCountdown,
            ActionKind::ResetStopwatch => UiRequest::ResetStopwatch,
        });
    }
}

/// "Wifi: <link status>". Hidden on boards without a radio.
#[derive(Clone, Copy, Debug, Default)]
pub struct WifiStatusScreen;

impl<R: HardwareClock> Screen<R> for WifiStatusScreen {
    fn render_frame(
        &mut self,
        frame: &mut Bitmap,
        edit: EditState,
        full_refresh: bool,
        ctx: &mut ScreenContext<'_, R>,
    ) {
        let status = ui_texts::wifi_status(ctx.wifi_status);
        ctx.render_scrolling_text(frame, full_refresh, edit, ui_texts::WIFI_COLON, "", status);
    }

    fn is_available(&self, ctx: &ScreenContext<'_, R>) -> bool {
        ctx.wifi_status != WifiStatus::NotAvailable
    }
}
