//! Event pointer addressing
//!
//! Every flag in the save image is named by an [`EventPointer`]. Pointers
//! below [`COMPLEX_EVENT_THRESHOLD`] address one bit of the simple event
//! record. Pointers at or above it address the complex record, ten
//! pointers per byte: the pointer divisible by ten names the whole byte and
//! the following nine name its bits. All resolution goes through
//! [`EventAddress::resolve`].

use crate::action::SetFlag;
use crate::error::Result;
use crate::save::{layout, SaveBuffer};
use log::trace;

/// Address of a flag in the save image
pub type EventPointer = u16;

/// First pointer of the complex event record
pub const COMPLEX_EVENT_THRESHOLD: EventPointer = 0xdac0;

/// A resolved event pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAddress {
    /// One bit of the simple event record
    Simple { byte: usize, bit: u8 },
    /// One bit (possibly spilling into the next byte) of the complex record
    ComplexBit { byte: usize, bit: u8 },
    /// A whole byte of the complex record
    Complex { byte: usize },
}

impl EventAddress {
    pub fn resolve(ptr: EventPointer) -> Self {
        if ptr < COMPLEX_EVENT_THRESHOLD {
            return EventAddress::Simple {
                byte: layout::GAME_EVENT_RECORD + usize::from(ptr >> 3),
                bit: (ptr & 7) as u8,
            };
        }
        let (byte, bit) = complex_location(ptr);
        if (ptr - COMPLEX_EVENT_THRESHOLD) % 10 == 0 {
            EventAddress::Complex { byte }
        } else {
            EventAddress::ComplexBit { byte, bit }
        }
    }

    pub fn byte(&self) -> usize {
        match *self {
            EventAddress::Simple { byte, .. }
            | EventAddress::ComplexBit { byte, .. }
            | EventAddress::Complex { byte } => byte,
        }
    }

    /// Byte and bit holding the low bit of this address, with spill-over folded in
    fn bit_location(&self) -> (usize, u8) {
        match *self {
            EventAddress::Simple { byte, bit } | EventAddress::ComplexBit { byte, bit } => {
                (byte + usize::from(bit / 8), bit % 8)
            }
            EventAddress::Complex { byte } => (byte, 0),
        }
    }
}

/// Complex record location of `ptr`, computed regardless of the threshold
pub fn complex_location(ptr: EventPointer) -> (usize, u8) {
    let source = ptr.wrapping_add(0x2540);
    let byte = layout::COMPLEX_EVENT_RECORD + usize::from(source / 10);
    let bit = match source % 10 {
        0 => 0,
        n => (n - 1) as u8,
    };
    (byte, bit)
}

/// Read the value stored at `ptr`
///
/// Simple pointers yield 0 or 1. Complex pointers yield the byte starting
/// at their bit.
pub fn read_event(save: &SaveBuffer, ptr: EventPointer) -> Result<u32> {
    let value = match EventAddress::resolve(ptr) {
        EventAddress::Simple { byte, bit } => (save.read_u8(byte)? >> bit) & 1,
        EventAddress::Complex { byte } | EventAddress::ComplexBit { byte, bit: 0 } => {
            save.read_u8(byte)?
        }
        EventAddress::ComplexBit { byte, bit } => (save.read_u16(byte)? >> bit) as u8,
    };
    trace!("read event {:#06x} -> {:#x}", ptr, value);
    Ok(u32::from(value))
}

pub fn read_event_bool(save: &SaveBuffer, ptr: EventPointer) -> Result<bool> {
    Ok(read_event(save, ptr)? & 1 == 1)
}

/// Set or clear the single bit at `ptr`, leaving its neighbours untouched
pub fn set_event_flag(save: &mut SaveBuffer, ptr: EventPointer, value: bool) -> Result<()> {
    let (byte, bit) = EventAddress::resolve(ptr).bit_location();
    let old = save.read_u8(byte)?;
    let new = if value {
        old | (1 << bit)
    } else {
        old & !(1 << bit)
    };
    trace!(
        "set event {:#06x} ({:#x}.{}) {:#04x} -> {:#04x}",
        ptr,
        byte,
        bit,
        old,
        new
    );
    save.write_u8(byte, new)
}

pub fn set_event_flag_true(save: &mut SaveBuffer, ptr: EventPointer) -> Result<()> {
    set_event_flag(save, ptr, true)
}

pub fn set_event_flag_false(save: &mut SaveBuffer, ptr: EventPointer) -> Result<()> {
    set_event_flag(save, ptr, false)
}

/// Apply a dialog `SetFlag` payload
///
/// A whole-byte complex pointer is masked, or'd and xor'd in place. Any
/// other pointer falls back to three independent bit writes of
/// `event_value`: the pointer itself, the pointer formed by
/// `event_data:event_mask`, and `always_zero`, each skipped when zero.
pub fn set_event_dialog_action(save: &mut SaveBuffer, flag: &SetFlag) -> Result<()> {
    if let EventAddress::Complex { byte } = EventAddress::resolve(flag.event_pointer) {
        let old = save.read_u8(byte)?;
        let new = complex_update(old, flag);
        trace!(
            "set complex event {:#06x} ({:#x}) {:#04x} -> {:#04x}",
            flag.event_pointer,
            byte,
            old,
            new
        );
        return save.write_u8(byte, new);
    }

    let value = flag.event_value != 0;
    let packed = u16::from_le_bytes([flag.event_mask, flag.event_data]);
    for ptr in [flag.event_pointer, packed, flag.always_zero] {
        if ptr != 0 {
            set_event_flag(save, ptr, value)?;
        }
    }
    Ok(())
}

/// New byte value written by a whole-byte `SetFlag`
pub fn complex_update(old: u8, flag: &SetFlag) -> u8 {
    ((old & flag.event_mask) | flag.event_data) ^ (flag.always_zero as u8)
}
