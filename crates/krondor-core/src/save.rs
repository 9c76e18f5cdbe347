//! The save image
//!
//! A save is a flat little-endian byte image. Every access is bounds
//! checked; reaching past the end is reported as [`Error::CorruptState`]
//! since the format carries no bounds metadata of its own.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed offsets into the save image
pub mod layout {
    /// Current chapter, u16
    pub const CHAPTER: usize = 0x5a;
    /// Party purse in royals, u32
    pub const GOLD: usize = 0x66;
    /// Current time in ticks, u32
    pub const TIME: usize = 0x6a;
    /// Time the party last slept, u32
    pub const TIME_LAST_SLEPT: usize = 0x6e;
    /// Current zone, u8
    pub const ZONE: usize = 0x76;
    /// u16 entry count followed by 8-byte time expiring entries
    pub const TIME_EXPIRING_RECORD: usize = 0x618;
    pub const TIME_EXPIRING_ENTRY_LEN: usize = 8;
    /// Purse stashed at the start of each chapter, one u32 per chapter 1..=9
    pub const PARTY_MONEY_STASH: usize = 0x6ba;
    /// Base of the one-bit-per-flag event record
    pub const GAME_EVENT_RECORD: usize = 0x6e2;
    /// Base of the byte-addressed complex event record
    pub const COMPLEX_EVENT_RECORD: usize = 0xb09;
    /// First byte past every addressable event
    pub const EVENT_RECORD_END: usize = 0x2240;
}

/// Owned save image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBuffer {
    bytes: Vec<u8>,
}

impl SaveBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// A zero-filled image of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// A zero-filled image large enough for every event pointer
    pub fn blank() -> Self {
        Self::zeroed(layout::EVENT_RECORD_END)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn span(&self, offset: usize, width: usize) -> Result<std::ops::Range<usize>> {
        match offset.checked_add(width) {
            Some(end) if end <= self.bytes.len() => Ok(offset..end),
            _ => Err(Error::CorruptState {
                offset,
                width,
                len: self.bytes.len(),
            }),
        }
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let range = self.span(offset, N)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.bytes[range]);
        Ok(out)
    }

    fn write_array<const N: usize>(&mut self, offset: usize, data: [u8; N]) -> Result<()> {
        let range = self.span(offset, N)?;
        self.bytes[range].copy_from_slice(&data);
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read_array::<1>(offset)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<()> {
        self.write_array(offset, [value])
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.write_array(offset, value.to_le_bytes())
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        self.write_array(offset, value.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_access() {
        let mut save = SaveBuffer::zeroed(8);
        save.write_u32(2, 0x1122_3344).unwrap();
        assert_eq!(save.as_bytes()[2..6], [0x44, 0x33, 0x22, 0x11]);
        assert_eq!(save.read_u16(2).unwrap(), 0x3344);
        assert_eq!(save.read_u8(5).unwrap(), 0x11);
    }

    #[test]
    fn test_out_of_bounds_is_corruption() {
        let mut save = SaveBuffer::zeroed(4);
        let err = save.read_u32(1).unwrap_err();
        assert_eq!(
            err,
            Error::CorruptState {
                offset: 1,
                width: 4,
                len: 4
            }
        );
        assert!(err.is_corruption());
        assert!(save.write_u8(4, 1).is_err());
        assert!(save.read_u8(usize::MAX).is_err());
    }

    #[test]
    fn test_header_fits_before_ledger() {
        assert!(layout::ZONE < layout::TIME_EXPIRING_RECORD);
        let ledger_end =
            layout::TIME_EXPIRING_RECORD + 2 + 0x14 * layout::TIME_EXPIRING_ENTRY_LEN;
        assert!(ledger_end <= layout::GAME_EVENT_RECORD);
    }
}
