/// Link state reported by the Wi-Fi layer, shown on the Wi-Fi screen.
///
/// `NotAvailable` means the board has no radio; the screen hides itself then.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiStatus {
    #[default]
    NotAvailable,
    Unknown,
    Ok,
    Down,
    Connecting,
    NoIp,
    Connected,
    ConnectionFailed,
    NoNetworkFound,
    AuthenticationFailed,
}
