//! Network Time Protocol (NTP) packet handling and, with the `wifi` feature, the fetch task.
//!
//! The clock only needs one SNTP round trip: send a 48-byte client request, take the
//! transmit timestamp from the reply. The result (or the reason it failed) is posted to the
//! [`ClockInbox`](crate::inbox::ClockInbox) and applied by the UI at the start of a frame.

use crate::{Error, Result, unix_seconds::UnixSeconds};

/// Size of an NTP packet without extensions.
pub const NTP_PACKET_LEN: usize = 48;
/// Standard NTP port.
pub const NTP_PORT: u16 = 123;

const SERVER_MODE: u8 = 4;
const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;
/// One millisecond in NTP fraction units (2^32 / 1000).
const FRACTION_PER_MILLI: u32 = 4_294_967;

/// A time received from the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpTime {
    pub utc: UnixSeconds,
    /// Sub-second part of the transmit timestamp, 0..=999.
    pub millis: u16,
}

/// Why a network time request produced no time. Advisory only; nobody retries on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NtpFailure {
    DnsFailed,
    InvalidResponse,
    Timeout,
}

/// Client request: LI=0, VN=3, Mode=3.
#[must_use]
pub const fn request_packet() -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = 0x1B;
    packet
}

/// Extract the transmit timestamp from a server reply.
///
/// # Errors
///
/// Returns [`Error::NtpResponseInvalid`] unless the reply is exactly one packet long, in
/// server mode and from a synchronized server (non-zero stratum), and
/// [`Error::NtpTimestampOutOfRange`] for timestamps before 1970.
pub fn parse_response(response: &[u8]) -> Result<NtpTime> {
    if response.len() != NTP_PACKET_LEN {
        return Err(Error::NtpResponseInvalid);
    }
    let mode = response.first().map_or(0, |byte| byte & 0x07);
    let stratum = response.get(1).copied().unwrap_or(0);
    if mode != SERVER_MODE || stratum == 0 {
        return Err(Error::NtpResponseInvalid);
    }

    let seconds = read_be_u32(response, TRANSMIT_TIMESTAMP_OFFSET)?;
    let fraction = read_be_u32(response, TRANSMIT_TIMESTAMP_OFFSET + 4)?;
    let utc = UnixSeconds::from_ntp_seconds(seconds).ok_or(Error::NtpTimestampOutOfRange)?;
    let millis = u16::try_from((fraction / FRACTION_PER_MILLI).min(999)).unwrap_or(999);
    Ok(NtpTime { utc, millis })
}

fn read_be_u32(bytes: &[u8], at: usize) -> Result<u32> {
    bytes
        .get(at..at + 4)
        .and_then(|slice| slice.try_into().ok())
        .map(u32::from_be_bytes)
        .ok_or(Error::NtpResponseInvalid)
}

#[cfg(feature = "wifi")]
mod wifi_impl {
    use embassy_net::{Stack, dns::DnsQueryType, udp};

    use super::{NTP_PACKET_LEN, NTP_PORT, NtpFailure, NtpTime, parse_response, request_packet};
    use crate::{inbox::{ClockEvent, ClockInbox}, shared_constants::NTP_TIMEOUT};

    /// NTP server baked in by `build.rs` (`NTP_SERVER`, default `pool.ntp.org`).
    pub const NTP_SERVER: &str = env!("NTP_SERVER");

    /// Run one NTP request and post the outcome to `inbox`.
    ///
    /// Exactly one of [`ClockEvent::NetworkTime`] or [`ClockEvent::NetworkTimeFailed`] is
    /// posted, waiting for room in a full inbox. Scheduling further requests is up to the
    /// caller.
    pub async fn fetch_network_time(stack: Stack<'_>, inbox: &ClockInbox) {
        let event = match fetch(stack).await {
            Ok(time) => {
                info!("NTP time received: unix_seconds={}", time.utc.as_i64());
                ClockEvent::NetworkTime(time)
            }
            Err(failure) => {
                warn!("NTP request failed: {:?}", failure);
                ClockEvent::NetworkTimeFailed(failure)
            }
        };
        inbox.send(event).await;
    }

    async fn fetch(stack: Stack<'_>) -> Result<NtpTime, NtpFailure> {
        info!("Resolving NTP host {}...", NTP_SERVER);
        let addresses = stack
            .dns_query(NTP_SERVER, DnsQueryType::A)
            .await
            .map_err(|_| NtpFailure::DnsFailed)?;
        let server = *addresses.first().ok_or(NtpFailure::DnsFailed)?;

        let mut rx_meta = [udp::PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0; 128];
        let mut tx_meta = [udp::PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0; 128];
        let mut socket = udp::UdpSocket::new(
            stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| NtpFailure::InvalidResponse)?;
        socket
            .send_to(&request_packet(), (server, NTP_PORT))
            .await
            .map_err(|_| NtpFailure::InvalidResponse)?;

        let mut response = [0u8; NTP_PACKET_LEN + 16];
        let (len, _from) = embassy_time::with_timeout(NTP_TIMEOUT, socket.recv_from(&mut response))
            .await
            .map_err(|_| NtpFailure::Timeout)?
            .map_err(|_| NtpFailure::InvalidResponse)?;
        let reply = response.get(..len).ok_or(NtpFailure::InvalidResponse)?;
        parse_response(reply).map_err(|_| NtpFailure::InvalidResponse)
    }
}

#[cfg(feature = "wifi")]
pub use wifi_impl::{NTP_SERVER, fetch_network_time};
