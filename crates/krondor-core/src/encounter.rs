//! Encounter gating
//!
//! The world layer asks whether an encounter placed on a tile may fire and
//! reports back once it has. Everything here reads and writes the
//! encounter ranges of the event store.

use crate::error::Result;
use crate::game_state::GameState;
use crate::state::{self, EventPointer};
use log::debug;
use serde::{Deserialize, Serialize};

/// Save-relevant fields of a placed encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncounterFlags {
    /// Position among the encounters of its tile
    pub index: u8,
    pub tile: u8,
    /// Must be set for the encounter to fire
    #[serde(default)]
    pub require_set: EventPointer,
    /// Must be clear for the encounter to fire
    #[serde(default)]
    pub require_clear: EventPointer,
    /// Set once the encounter has run
    #[serde(default)]
    pub set_after: EventPointer,
    /// Fires once per chapter
    #[serde(default)]
    pub once_per_chapter: bool,
    /// Never inhibited by having run
    #[serde(default)]
    pub always_encounter: bool,
}

impl GameState {
    /// Whether a non-combat encounter may fire
    pub fn check_encounter_active(&self, encounter: &EncounterFlags) -> Result<bool> {
        if self.save.is_none() {
            return Ok(true);
        }
        let seen = self.check_unique_encounter(encounter)?;
        let recent = self
            .read_save(|save| state::encounter::check_recently_encountered(save, encounter.index))?;
        let blocked = self.encounter_blocked_by_events(encounter)?;
        Ok(!(seen || recent || blocked))
    }

    /// Whether a combat encounter may fire
    pub fn check_combat_active(&self, encounter: &EncounterFlags, combat: u16) -> Result<bool> {
        let seen = self.check_unique_encounter(encounter)?;
        let fought = self
            .read_save(|save| state::encounter::check_combat_encounter_state_flag(save, combat))?;
        let blocked = self.encounter_blocked_by_events(encounter)?;
        debug!(
            "combat {}: seen {} fought {} blocked {}",
            combat, seen, fought, blocked
        );
        Ok(!(seen || fought || blocked))
    }

    fn check_unique_encounter(&self, encounter: &EncounterFlags) -> Result<bool> {
        let zone = self.zone;
        self.read_save(|save| {
            state::encounter::check_unique_encounter_state_flag(
                save,
                zone,
                encounter.tile,
                encounter.index,
            )
        })
    }

    fn encounter_blocked_by_events(&self, encounter: &EncounterFlags) -> Result<bool> {
        let missing = encounter.require_set != 0 && self.get_event_state(encounter.require_set)? == 0;
        let present =
            encounter.require_clear != 0 && self.get_event_state(encounter.require_clear)? != 0;
        Ok(missing || present)
    }

    /// Bookkeeping after a dialog encounter ran
    pub fn set_post_dialog_event_flags(&mut self, encounter: &EncounterFlags) -> Result<()> {
        self.set_encounter_done_flag(encounter)?;
        if encounter.always_encounter {
            return Ok(());
        }
        if encounter.once_per_chapter {
            self.set_unique_encounter(encounter)?;
        }
        let index = encounter.index;
        self.write_save(|save| state::encounter::set_recently_encountered(save, index))
    }

    /// Bookkeeping after a town or background scene ran
    pub fn set_post_gds_event_flags(&mut self, encounter: &EncounterFlags) -> Result<()> {
        self.set_encounter_done_flag(encounter)
    }

    /// Bookkeeping after a block, enable, disable, sound or zone encounter ran
    pub fn set_post_enable_or_disable_event_flags(&mut self, encounter: &EncounterFlags) -> Result<()> {
        self.set_encounter_done_flag(encounter)?;
        if encounter.once_per_chapter {
            self.set_unique_encounter(encounter)?;
        }
        Ok(())
    }

    fn set_encounter_done_flag(&mut self, encounter: &EncounterFlags) -> Result<()> {
        if encounter.set_after != 0 {
            self.set_event_value(encounter.set_after, 1)?;
        }
        Ok(())
    }

    fn set_unique_encounter(&mut self, encounter: &EncounterFlags) -> Result<()> {
        let zone = self.zone;
        self.write_save(|save| {
            state::encounter::set_unique_encounter_state_flag(
                save,
                zone,
                encounter.tile,
                encounter.index,
                true,
            )
        })
    }

    /// Forget the per-tile markers when the party moves on
    pub fn clear_tile_recent_encounters(&mut self) -> Result<()> {
        self.write_save(state::encounter::clear_tile_recent_encounters)
    }

    /// Quest flags raised by winning particular combats
    pub fn set_post_combat_combat_specific_flags(&mut self, combat: u16) -> Result<()> {
        let (required, reward): (&[EventPointer], EventPointer) = match combat {
            131..=135 => (&[0x14e7, 0x14e8, 0x14e9, 0x14ea, 0x14eb], 0xdb1c),
            610 | 613 | 615 | 618 | 619 | 621 => {
                (&[0x16c6, 0x16c9, 0x16cb, 0x16ce, 0x16cf, 0x16d1], 0x1d17)
            }
            _ => return Ok(()),
        };
        for ptr in required {
            if !self.read_event_bool(*ptr)? {
                return Ok(());
            }
        }
        debug!("combat {} completes its quest, setting {:#x}", combat, reward);
        self.set_event_value(reward, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::testing::fresh_state;
    use crate::identity::ZoneNumber;
    use crate::party::Party;

    fn encounter() -> EncounterFlags {
        EncounterFlags {
            index: 2,
            tile: 5,
            require_set: 0x100,
            require_clear: 0x101,
            set_after: 0x102,
            once_per_chapter: true,
            ..EncounterFlags::default()
        }
    }

    #[test]
    fn test_event_requirements() {
        let mut state = fresh_state();
        let encounter = encounter();
        assert!(!state.check_encounter_active(&encounter).unwrap());
        state.set_event_value(0x100, 1).unwrap();
        assert!(state.check_encounter_active(&encounter).unwrap());
        state.set_event_value(0x101, 1).unwrap();
        assert!(!state.check_encounter_active(&encounter).unwrap());
    }

    #[test]
    fn test_dialog_encounter_runs_once() {
        let mut state = fresh_state();
        let encounter = encounter();
        state.set_event_value(0x100, 1).unwrap();
        state.set_post_dialog_event_flags(&encounter).unwrap();

        assert!(state.read_event_bool(0x102).unwrap());
        assert!(!state.check_encounter_active(&encounter).unwrap());

        // leaving the tile lifts the recent marker but not the unique one
        state.clear_tile_recent_encounters().unwrap();
        assert!(!state.check_encounter_active(&encounter).unwrap());

        state.set_zone(ZoneNumber(2));
        assert!(state.check_encounter_active(&encounter).unwrap());
    }

    #[test]
    fn test_repeatable_encounter_only_recent() {
        let mut state = fresh_state();
        let encounter = EncounterFlags {
            once_per_chapter: false,
            require_set: 0,
            ..encounter()
        };
        state.set_post_dialog_event_flags(&encounter).unwrap();
        assert!(!state.check_encounter_active(&encounter).unwrap());
        state.clear_tile_recent_encounters().unwrap();
        assert!(state.check_encounter_active(&encounter).unwrap());
    }

    #[test]
    fn test_combat_gating() {
        let mut state = fresh_state();
        let encounter = EncounterFlags {
            require_set: 0,
            ..encounter()
        };
        assert!(state.check_combat_active(&encounter, 40).unwrap());
        state
            .write_save(|save| state::encounter::set_combat_encounter_state(save, 40, true))
            .unwrap();
        assert!(!state.check_combat_active(&encounter, 40).unwrap());
    }

    #[test]
    fn test_rusalki_quest_completion() {
        let mut state = fresh_state();
        for ptr in [0x14e7, 0x14e8, 0x14e9, 0x14ea] {
            state.set_event_value(ptr, 1).unwrap();
        }
        state.set_post_combat_combat_specific_flags(133).unwrap();
        assert_eq!(state.get_event_state(0xdb1c).unwrap() & 1, 0);
        state.set_event_value(0x14eb, 1).unwrap();
        state.set_post_combat_combat_specific_flags(133).unwrap();
        assert!(state.read_event_bool(0xdb1c).unwrap());
    }

    #[test]
    fn test_no_save_always_active() {
        let state = GameState::new(Party::default());
        assert!(state.check_encounter_active(&encounter()).unwrap());
    }
}
