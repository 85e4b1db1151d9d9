//! Type-safe persistent storage of one settings record using postcard serialization.
//!
//! The physical medium (an internal flash sector on the board, a byte array on the host)
//! sits behind [`SettingsStorage`]; this module owns the record format.
//!
//! # Storage Format
//!
//! Each block contains:
//! - Magic number (4 bytes): `0x434C4B53` ('CLKS')
//! - Type hash (4 bytes): FNV-1a hash of the type name
//! - Payload length (2 bytes): Length of serialized data
//! - Payload: Postcard-serialized data
//! - CRC32 (4 bytes): Checksum of header and payload
//!
//! A missing magic number or a type hash mismatch loads as `None` (nothing stored yet, or a
//! firmware with a different settings layout). A bad length, CRC or payload is corruption.

use core::marker::PhantomData;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Size of the block read from and written to storage.
pub const SETTINGS_BLOCK_SIZE: usize = 256;

const MAGIC: u32 = 0x434C_4B53; // 'CLKS'
const HEADER_SIZE: usize = 4 + 4 + 2; // Magic + TypeHash + PayloadLen
const CRC_SIZE: usize = 4;
const MAX_PAYLOAD_SIZE: usize = SETTINGS_BLOCK_SIZE - HEADER_SIZE - CRC_SIZE;

/// The medium a settings block lives on.
pub trait SettingsStorage {
    /// Fill `buffer` (always [`SETTINGS_BLOCK_SIZE`] bytes) from storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingsStorage`] if the medium cannot be read.
    fn read_block(&mut self, buffer: &mut [u8]) -> Result<()>;

    /// Replace the stored block with `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingsStorage`] if the medium cannot be written.
    fn write_block(&mut self, data: &[u8]) -> Result<()>;
}

/// RAM-backed storage for host builds and tests. Starts erased (all `0xFF`).
#[derive(Clone, Debug)]
pub struct MemoryStorage {
    bytes: [u8; SETTINGS_BLOCK_SIZE],
    write_count: u32,
}

impl MemoryStorage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; SETTINGS_BLOCK_SIZE],
            write_count: 0,
        }
    }

    #[must_use]
    pub const fn write_count(&self) -> u32 {
        self.write_count
    }

    /// Raw stored bytes, for corrupting on purpose in tests.
    pub const fn bytes_mut(&mut self) -> &mut [u8; SETTINGS_BLOCK_SIZE] {
        &mut self.bytes
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStorage for MemoryStorage {
    fn read_block(&mut self, buffer: &mut [u8]) -> Result<()> {
        let source = self
            .bytes
            .get(..buffer.len())
            .ok_or(Error::SettingsStorage)?;
        buffer.copy_from_slice(source);
        Ok(())
    }

    fn write_block(&mut self, data: &[u8]) -> Result<()> {
        let target = self
            .bytes
            .get_mut(..data.len())
            .ok_or(Error::SettingsStorage)?;
        target.copy_from_slice(data);
        self.write_count = self.write_count.saturating_add(1);
        Ok(())
    }
}

/// Typed view of the settings block.
pub struct SettingsBlock<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> SettingsBlock<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Load the stored value.
    ///
    /// Returns `Ok(Some(value))` if valid data of the correct type is found,
    /// `Ok(None)` if no data is stored or type mismatch occurs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SettingsCorrupted`] if the stored record fails validation, or the
    /// storage's own error if it cannot be read.
    pub fn load(&self, storage: &mut impl SettingsStorage) -> Result<Option<T>> {
        let mut buffer = [0u8; SETTINGS_BLOCK_SIZE];
        storage.read_block(&mut buffer)?;

        // Check magic number
        if read_u32(&buffer, 0) != Some(MAGIC) {
            info!("SettingsBlock: No settings stored");
            return Ok(None);
        }

        // Check type hash
        let stored_type_hash = read_u32(&buffer, 4).ok_or(Error::SettingsCorrupted)?;
        let expected_type_hash = compute_type_hash::<T>();
        if stored_type_hash != expected_type_hash {
            info!(
                "SettingsBlock: Type mismatch (expected hash {}, found {})",
                expected_type_hash, stored_type_hash
            );
            return Ok(None);
        }

        // Read payload length
        let payload_len = buffer
            .get(8..10)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u16::from_le_bytes)
            .map(usize::from)
            .ok_or(Error::SettingsCorrupted)?;
        if payload_len > MAX_PAYLOAD_SIZE {
            error!("SettingsBlock: Invalid payload length {}", payload_len);
            return Err(Error::SettingsCorrupted);
        }

        // Verify CRC
        let crc_offset = HEADER_SIZE + payload_len;
        let stored_crc = read_u32(&buffer, crc_offset).ok_or(Error::SettingsCorrupted)?;
        let computed_crc = buffer
            .get(..crc_offset)
            .map(compute_crc)
            .ok_or(Error::SettingsCorrupted)?;
        if stored_crc != computed_crc {
            error!(
                "SettingsBlock: CRC mismatch (expected {}, found {})",
                computed_crc, stored_crc
            );
            return Err(Error::SettingsCorrupted);
        }

        // Deserialize payload
        let payload = buffer
            .get(HEADER_SIZE..crc_offset)
            .ok_or(Error::SettingsCorrupted)?;
        let value: T = postcard::from_bytes(payload).map_err(|_| {
            error!("SettingsBlock: Deserialization failed");
            Error::SettingsCorrupted
        })?;

        info!("SettingsBlock: Loaded {} bytes", payload_len);
        Ok(Some(value))
    }

    /// Save `value`, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatError`] if the serialized data does not fit the block, or the
    /// storage's own error if it cannot be written.
    pub fn save(&self, storage: &mut impl SettingsStorage, value: &T) -> Result<()> {
        let mut buffer = [0xFFu8; SETTINGS_BLOCK_SIZE];

        let payload_len = {
            let payload_area = buffer
                .get_mut(HEADER_SIZE..HEADER_SIZE + MAX_PAYLOAD_SIZE)
                .ok_or(Error::FormatError)?;
            postcard::to_slice(value, payload_area)
                .map_err(|_| {
                    error!(
                        "SettingsBlock: Serialization failed or data too large (max {} bytes)",
                        MAX_PAYLOAD_SIZE
                    );
                    Error::FormatError
                })?
                .len()
        };
        let encoded_len = u16::try_from(payload_len).map_err(|_| Error::FormatError)?;

        // Write header
        write_bytes(&mut buffer, 0, &MAGIC.to_le_bytes())?;
        write_bytes(&mut buffer, 4, &compute_type_hash::<T>().to_le_bytes())?;
        write_bytes(&mut buffer, 8, &encoded_len.to_le_bytes())?;

        // Compute and write CRC
        let crc_offset = HEADER_SIZE + payload_len;
        let crc = buffer
            .get(..crc_offset)
            .map(compute_crc)
            .ok_or(Error::FormatError)?;
        write_bytes(&mut buffer, crc_offset, &crc.to_le_bytes())?;

        storage.write_block(&buffer)?;
        info!("SettingsBlock: Saved {} bytes", payload_len);
        Ok(())
    }

    /// Erase the stored record. After this, [`load`](Self::load) returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the storage's error if it cannot be written.
    pub fn clear(&self, storage: &mut impl SettingsStorage) -> Result<()> {
        storage.write_block(&[0xFF; SETTINGS_BLOCK_SIZE])?;
        info!("SettingsBlock: Cleared");
        Ok(())
    }
}

impl<T> Default for SettingsBlock<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

fn read_u32(buffer: &[u8], at: usize) -> Option<u32> {
    let bytes = buffer.get(at..at + 4)?;
    bytes.try_into().ok().map(u32::from_le_bytes)
}

fn write_bytes(buffer: &mut [u8], at: usize, bytes: &[u8]) -> Result<()> {
    buffer
        .get_mut(at..at + bytes.len())
        .ok_or(Error::FormatError)?
        .copy_from_slice(bytes);
    Ok(())
}

/// Compute FNV-1a hash of the type name for type safety.
fn compute_type_hash<T>() -> u32 {
    const FNV_PRIME: u32 = 16_777_619;
    const FNV_OFFSET: u32 = 2_166_136_261;

    let type_name = core::any::type_name::<T>();
    let mut hash = FNV_OFFSET;

    for byte in type_name.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    hash
}

/// Compute CRC32 checksum.
fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
