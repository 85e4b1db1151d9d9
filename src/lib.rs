//! Control core of a battery-free LED matrix desk clock.
//!
//! - [`engine::TimeEngine`] keeps the time, reconciling a frame counter, an optional
//!   battery-backed hardware clock and network time, and fires the two weekly alarms.
//! - [`ui::ClockUi`] runs the frame-paced menu of [`screens`] on a 24x8 [`display`].
//! - [`runner::run_clock`] drives both from an async executor.
//!
//! The crate is `no_std`; the `host` feature adds PNG export of frames for tests.
#![no_std]

#[cfg(feature = "host")]
extern crate std;

// Must come first: the logging macros are used by every other module.
#[macro_use]
mod fmt;

pub mod alarm;
pub mod bitmap;
pub mod broken_down_time;
pub mod button;
pub mod config;
pub mod cyclic_counter;
pub mod display;
pub mod ds3231;
pub mod dst;
pub mod engine;
mod error;
pub mod field_editor;
pub mod inbox;
pub mod moving_average;
pub mod ntp;
pub mod rtc;
pub mod runner;
pub mod screens;
pub mod scroll;
pub mod settings;
pub mod settings_block;
pub mod shared_constants;
pub mod sound;
pub mod ui;
pub mod ui_texts;
pub mod unix_seconds;
pub mod wifi_status;

pub use error::{Error, Result};
