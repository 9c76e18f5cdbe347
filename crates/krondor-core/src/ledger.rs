//! Time expiring state ledger
//!
//! Timed effects kept in creation order: light sources, spell durations and
//! scheduled flag sets and resets. The reduce pass that applies their
//! effects lives on [`GameState`](crate::GameState) since it touches the
//! party and the event store; this module owns storage, insertion rules and
//! persistence.

use crate::error::{Error, Result};
use crate::save::{layout, SaveBuffer};
use crate::time::Time;
use serde::{Deserialize, Serialize};

/// Largest number of concurrent timed effects the save record holds
pub const LEDGER_CAPACITY: usize = 0x14;

/// Insertion flag: extend an existing matching entry
pub const FLAG_EXTEND: u8 = 0x80;
/// Insertion flag: append even when a matching entry exists
pub const FLAG_ALLOW_DUPLICATE: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExpiringStateType {
    None = 0,
    Light = 1,
    Spell = 2,
    SetState = 3,
    ResetState = 4,
}

impl ExpiringStateType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::None,
            1 => Self::Light,
            2 => Self::Spell,
            3 => Self::SetState,
            4 => Self::ResetState,
            _ => return None,
        })
    }

    pub fn raw(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeExpiringState {
    pub kind: ExpiringStateType,
    pub flags: u8,
    /// Light type, spell index or event pointer depending on `kind`
    pub data: u16,
    pub duration: Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeExpiringLedger {
    entries: Vec<TimeExpiringState>,
    capacity: usize,
}

impl TimeExpiringLedger {
    /// Capacity is capped at [`LEDGER_CAPACITY`]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.min(LEDGER_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[TimeExpiringState] {
        &self.entries
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TimeExpiringState> {
        self.entries.get_mut(index)
    }

    /// Add or merge a timed effect
    ///
    /// Unless only [`FLAG_ALLOW_DUPLICATE`] is given, an entry of the same
    /// kind and data is reused: its duration is extended under
    /// [`FLAG_EXTEND`] and replaced otherwise. Returns `None` when a new
    /// entry is needed and the ledger is full.
    pub fn add(
        &mut self,
        kind: ExpiringStateType,
        data: u16,
        flags: u8,
        duration: Time,
    ) -> Option<&TimeExpiringState> {
        let merge = flags & FLAG_EXTEND != 0 || flags & FLAG_ALLOW_DUPLICATE == 0;
        if merge {
            if let Some(pos) = self
                .entries
                .iter()
                .position(|e| e.kind == kind && e.data == data)
            {
                let entry = &mut self.entries[pos];
                if flags & FLAG_EXTEND != 0 {
                    entry.duration += duration;
                } else {
                    entry.duration = duration;
                }
                return Some(&self.entries[pos]);
            }
        }

        if self.entries.len() >= self.capacity {
            return None;
        }
        self.entries.push(TimeExpiringState {
            kind,
            flags,
            data,
            duration,
        });
        self.entries.last()
    }

    pub fn add_light(&mut self, light: u16, duration: Time) -> Option<&TimeExpiringState> {
        self.add(ExpiringStateType::Light, light, FLAG_EXTEND, duration)
    }

    pub fn add_spell(&mut self, spell: u16, duration: Time) -> Option<&TimeExpiringState> {
        self.add(ExpiringStateType::Spell, spell, FLAG_EXTEND, duration)
    }

    /// Subtract `delta` from entry `index`, saturating, and return its new value
    pub fn decay(&mut self, index: usize, delta: Time) -> Option<TimeExpiringState> {
        let entry = self.entries.get_mut(index)?;
        entry.duration = entry.duration.saturating_sub(delta);
        Some(*entry)
    }

    /// Drop every entry whose duration reached zero
    pub fn remove_expired(&mut self) {
        self.entries.retain(|e| !e.duration.is_zero());
    }

    pub fn remove_kind(&mut self, kind: ExpiringStateType) {
        self.entries.retain(|e| e.kind != kind);
    }

    pub fn has_active(&self, kind: ExpiringStateType) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == kind && !e.duration.is_zero())
    }

    pub fn find(&self, kind: ExpiringStateType, data: u16) -> Option<&TimeExpiringState> {
        self.entries.iter().find(|e| e.kind == kind && e.data == data)
    }

    /// Read the ledger record of a save image
    pub fn load(save: &SaveBuffer, capacity: usize) -> Result<Self> {
        let capacity = capacity.min(LEDGER_CAPACITY);
        let base = layout::TIME_EXPIRING_RECORD;
        let count = usize::from(save.read_u16(base)?);
        if count > capacity {
            return Err(Error::invalid(format!(
                "save holds {} timed effects, capacity is {}",
                count, capacity
            )));
        }

        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let offset = base + 2 + i * layout::TIME_EXPIRING_ENTRY_LEN;
            let raw_kind = save.read_u8(offset)?;
            let kind = ExpiringStateType::from_raw(raw_kind).ok_or_else(|| {
                Error::invalid(format!("unknown timed effect type {}", raw_kind))
            })?;
            entries.push(TimeExpiringState {
                kind,
                flags: save.read_u8(offset + 1)?,
                data: save.read_u16(offset + 2)?,
                duration: Time(save.read_u32(offset + 4)?),
            });
        }
        Ok(Self { entries, capacity })
    }

    /// Write the ledger record into a save image
    pub fn store(&self, save: &mut SaveBuffer) -> Result<()> {
        let base = layout::TIME_EXPIRING_RECORD;
        save.write_u16(base, self.entries.len() as u16)?;
        for (i, entry) in self.entries.iter().enumerate() {
            let offset = base + 2 + i * layout::TIME_EXPIRING_ENTRY_LEN;
            save.write_u8(offset, entry.kind.raw())?;
            save.write_u8(offset + 1, entry.flags)?;
            save.write_u16(offset + 2, entry.data)?;
            save.write_u32(offset + 4, entry.duration.raw())?;
        }
        Ok(())
    }
}

impl Default for TimeExpiringLedger {
    fn default() -> Self {
        Self::new(LEDGER_CAPACITY)
    }
}
