//! Encounter bookkeeping flags
//!
//! Unique encounters are keyed by zone, tile and the encounter's index on
//! that tile. "Recently encountered" and "combat scouted" are per-tile
//! scratch flags cleared whenever the party changes tile.

use super::event::{read_event_bool, set_event_flag};
use super::offsets::{COMBAT_ENCOUNTER, COMBAT_SCOUTED, RECENTLY_ENCOUNTERED, UNIQUE_ENCOUNTER};
use crate::error::{Error, Result};
use crate::identity::ZoneNumber;
use crate::save::SaveBuffer;

/// Encounter slots per tile
pub const ENCOUNTERS_PER_TILE: u8 = 10;
/// Unique encounter flags per zone
pub const UNIQUE_FLAGS_PER_ZONE: u32 = 0x190;
/// Combats at or past this index have no flag and always trigger
pub const ALWAYS_TRIGGERED_COMBAT: u16 = 0x3e8;

fn unique_encounter_pointer(zone: ZoneNumber, tile: u8, encounter: u8) -> Result<u16> {
    if zone.raw() == 0 || encounter >= ENCOUNTERS_PER_TILE {
        return Err(Error::invalid(format!(
            "no unique encounter {} on tile {} of {}",
            encounter, tile, zone
        )));
    }
    let offset = (u32::from(zone.raw()) - 1) * UNIQUE_FLAGS_PER_ZONE
        + u32::from(tile) * u32::from(ENCOUNTERS_PER_TILE)
        + u32::from(encounter);
    UNIQUE_ENCOUNTER.pointer(offset)
}

pub fn check_unique_encounter_state_flag(
    save: &SaveBuffer,
    zone: ZoneNumber,
    tile: u8,
    encounter: u8,
) -> Result<bool> {
    read_event_bool(save, unique_encounter_pointer(zone, tile, encounter)?)
}

pub fn set_unique_encounter_state_flag(
    save: &mut SaveBuffer,
    zone: ZoneNumber,
    tile: u8,
    encounter: u8,
    value: bool,
) -> Result<()> {
    set_event_flag(save, unique_encounter_pointer(zone, tile, encounter)?, value)
}

/// Reset every unique encounter flag of every zone
pub fn clear_unique_encounter_state_flags(save: &mut SaveBuffer) -> Result<()> {
    for ptr in UNIQUE_ENCOUNTER.pointers() {
        set_event_flag(save, ptr, false)?;
    }
    Ok(())
}

pub fn check_recently_encountered(save: &SaveBuffer, encounter: u8) -> Result<bool> {
    read_event_bool(save, RECENTLY_ENCOUNTERED.pointer(encounter.into())?)
}

pub fn set_recently_encountered(save: &mut SaveBuffer, encounter: u8) -> Result<()> {
    set_event_flag(save, RECENTLY_ENCOUNTERED.pointer(encounter.into())?, true)
}

pub fn check_combat_scouted(save: &SaveBuffer, encounter: u8) -> Result<bool> {
    read_event_bool(save, COMBAT_SCOUTED.pointer(encounter.into())?)
}

pub fn set_combat_scouted(save: &mut SaveBuffer, encounter: u8) -> Result<()> {
    set_event_flag(save, COMBAT_SCOUTED.pointer(encounter.into())?, true)
}

/// Forget the recent and scouted markers of the tile being left
pub fn clear_tile_recent_encounters(save: &mut SaveBuffer) -> Result<()> {
    for ptr in RECENTLY_ENCOUNTERED.pointers().chain(COMBAT_SCOUTED.pointers()) {
        set_event_flag(save, ptr, false)?;
    }
    Ok(())
}

/// Whether combat `combat` has already been fought
pub fn check_combat_encounter_state_flag(save: &SaveBuffer, combat: u16) -> Result<bool> {
    if combat >= ALWAYS_TRIGGERED_COMBAT {
        return Ok(true);
    }
    read_event_bool(save, COMBAT_ENCOUNTER.pointer(combat.into())?)
}

pub fn set_combat_encounter_state(save: &mut SaveBuffer, combat: u16, value: bool) -> Result<()> {
    if combat >= ALWAYS_TRIGGERED_COMBAT {
        return Ok(());
    }
    set_event_flag(save, COMBAT_ENCOUNTER.pointer(combat.into())?, value)
}
