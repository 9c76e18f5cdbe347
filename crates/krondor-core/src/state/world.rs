//! Doors, locks, temples and single-use items

use super::event::{read_event_bool, set_event_flag};
use super::offsets::{DOOR, ITEM_USED, LOCK_SEEN, TEMPLE_SEEN};
use crate::error::Result;
use crate::save::SaveBuffer;

/// Temples are numbered 1 through 12
pub const TEMPLE_COUNT: u8 = 12;

pub fn get_door_state(save: &SaveBuffer, door: u16) -> Result<bool> {
    read_event_bool(save, DOOR.pointer(door.into())?)
}

pub fn set_door_state(save: &mut SaveBuffer, door: u16, open: bool) -> Result<()> {
    set_event_flag(save, DOOR.pointer(door.into())?, open)
}

pub fn check_lock_seen(save: &SaveBuffer, lock: u16) -> Result<bool> {
    read_event_bool(save, LOCK_SEEN.pointer(lock.into())?)
}

pub fn set_lock_seen(save: &mut SaveBuffer, lock: u16) -> Result<()> {
    set_event_flag(save, LOCK_SEEN.pointer(lock.into())?, true)
}

pub fn read_temple_seen(save: &SaveBuffer, temple: u8) -> Result<bool> {
    read_event_bool(save, TEMPLE_SEEN.pointer(temple.into())?)
}

pub fn set_temple_seen(save: &mut SaveBuffer, temple: u8) -> Result<()> {
    set_event_flag(save, TEMPLE_SEEN.pointer(temple.into())?, true)
}

/// Whether the party has visited at least two temples
pub fn more_than_one_temple_seen(save: &SaveBuffer) -> Result<bool> {
    let mut seen = 0;
    for temple in 1..=TEMPLE_COUNT {
        if read_temple_seen(save, temple)? {
            seen += 1;
        }
    }
    Ok(seen > 1)
}

pub fn read_item_used(save: &SaveBuffer, slot: u8) -> Result<bool> {
    read_event_bool(save, ITEM_USED.pointer(slot.into())?)
}

pub fn set_item_used(save: &mut SaveBuffer, slot: u8) -> Result<()> {
    set_event_flag(save, ITEM_USED.pointer(slot.into())?, true)
}
