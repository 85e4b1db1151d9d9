//! The async frame loop.

use embassy_futures::select::{Either, select};
use embassy_time::Ticker;

use crate::{
    display::Display,
    inbox::ClockInbox,
    rtc::HardwareClock,
    settings_block::SettingsStorage,
    shared_constants::{FRAME_PERIOD, ONE_SECOND},
    sound::Buzzer,
    ui::ClockUi,
};

/// Drive `ui` forever: drain `inbox` and render a frame every [`FRAME_PERIOD`], and run the
/// slow per-second work in between frames.
///
/// The frame ticker catches up after a late frame instead of drifting, so the clock keeps
/// time as long as a frame fits its period on average.
pub async fn run_clock<R, D, B, S>(ui: &mut ClockUi<R, D, B, S>, inbox: &ClockInbox) -> !
where
    R: HardwareClock,
    D: Display,
    B: Buzzer,
    S: SettingsStorage,
{
    info!("Clock running at {} frames per second", crate::shared_constants::FRAME_RATE);
    let mut frames = Ticker::every(FRAME_PERIOD);
    let mut seconds = Ticker::every(ONE_SECOND);
    loop {
        match select(frames.next(), seconds.next()).await {
            Either::First(()) => {
                ui.process_inbox(inbox);
                ui.tick();
            }
            Either::Second(()) => ui.on_second(),
        }
    }
}
