use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// None of these ever escape the frame loop. The engine and UI turn each one into a
/// fallback (free-running time, default settings, a dropped event) and keep rendering.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[display("Hardware clock bus transfer failed")]
    HardwareClockBus,

    #[display("Hardware clock returned an invalid time")]
    HardwareClockData,

    #[display("Settings storage access failed")]
    SettingsStorage,

    #[display("Stored settings are corrupted")]
    SettingsCorrupted,

    #[display("Format error")]
    FormatError,

    #[display("NTP response is invalid")]
    NtpResponseInvalid,

    #[display("NTP timestamp is before the Unix epoch")]
    NtpTimestampOutOfRange,

    #[display("Calendar value out of range")]
    CalendarOutOfRange,

    #[display("Clock inbox is full")]
    InboxFull,
}

impl From<time::error::ComponentRange> for Error {
    fn from(_: time::error::ComponentRange) -> Self {
        Self::CalendarOutOfRange
    }
}

impl From<postcard::Error> for Error {
    fn from(_: postcard::Error) -> Self {
        Self::FormatError
    }
}
