//! Dialog choice evaluation
//!
//! [`GameState::evaluate_dialog_choice`] decides whether a [`Choice`]
//! holds against the current state. Evaluation never mutates anything.

use crate::choice::{ActiveStateFlag, Choice};
use crate::error::Result;
use crate::game_state::GameState;
use crate::party::inventory::NOTE;
use crate::state::{complex_location, EventPointer};
use log::debug;

/// An upper bound of this value means "no upper bound"
pub const UNBOUNDED: u16 = 0xffff;
/// Night runs from this hour...
const NIGHT_STARTS: u32 = 20;
/// ...until this one
const NIGHT_ENDS: u32 = 4;

impl GameState {
    pub fn evaluate_dialog_choice(&self, choice: &Choice) -> Result<bool> {
        let result = match *choice {
            Choice::NoChoice => true,
            Choice::EventFlag { event_ptr, expected } => {
                (self.get_event_state(event_ptr)? != 0) == expected
            }
            Choice::GameState { state, min, max } => {
                self.evaluate_game_state_choice(state, min, max)
            }
            Choice::CustomState { scenario } => self.evaluate_custom_state(scenario),
            Choice::Inventory { item, present } => self.party.have_item(item) == present,
            Choice::HaveNote { note } => self.party.active_characters().any(|c| {
                c.inventory
                    .items()
                    .iter()
                    .any(|i| i.item == NOTE && i.quantity == note)
            }),
            Choice::CastSpell { spell } => self.spell_state.is_active(spell),
            Choice::ComplexEvent {
                event_ptr,
                xor_mask,
                expected,
                must_equal_expected,
                ..
            } => self.evaluate_complex_choice(event_ptr, xor_mask, expected, must_equal_expected)?,
            Choice::Conversation { .. }
            | Choice::Query { .. }
            | Choice::Random { .. }
            | Choice::Unknown { .. } => {
                debug!("{:?} is decided by the presentation layer", choice);
                false
            }
        };
        Ok(result)
    }

    /// Current value of a game state scalar
    pub fn active_state_value(&self, state: ActiveStateFlag) -> u32 {
        let hour = self.clock.time().hour_of_day();
        let night = !(NIGHT_ENDS..NIGHT_STARTS).contains(&hour);
        match state {
            ActiveStateFlag::Context => self.context_value,
            ActiveStateFlag::Money => self.party.gold().sovereigns(),
            ActiveStateFlag::CantAfford => u32::from(self.party.gold() > self.item_value),
            ActiveStateFlag::Chapter => u32::from(self.chapter.raw()),
            ActiveStateFlag::NightTime => u32::from(night),
            ActiveStateFlag::DayTime => u32::from(!night),
            ActiveStateFlag::TimeBetween => hour,
            ActiveStateFlag::SkillCheck => u32::from(self.skill_value),
            ActiveStateFlag::ItemValue => self.item_value.0,
            ActiveStateFlag::ContextVar => self.context_var,
            ActiveStateFlag::Shop => self.shop_type,
            ActiveStateFlag::Zone => u32::from(self.zone.raw()),
            ActiveStateFlag::Gambler => self.bard_reward.0,
        }
    }

    /// `min <= value <= max`, where a `max` of [`UNBOUNDED`] has no ceiling
    pub fn evaluate_game_state_choice(&self, state: ActiveStateFlag, min: u16, max: u16) -> bool {
        let value = self.active_state_value(state);
        u32::from(min) <= value && (max == UNBOUNDED || value <= u32::from(max))
    }

    /// Masked comparison against a complex event
    ///
    /// A pointer naming a single bit of a complex byte is compared as a
    /// plain range when a save is loaded. The chapter mask is not consulted.
    pub fn evaluate_complex_choice(
        &self,
        event_ptr: EventPointer,
        xor_mask: u8,
        expected: u8,
        must_equal_expected: u8,
    ) -> Result<bool> {
        let state = (self.get_event_state(event_ptr)? & 0xff) as u8;
        let (_, bit) = complex_location(event_ptr);
        if self.save.is_some() && bit != 0 {
            return Ok(xor_mask <= state && state <= expected);
        }
        let masked = (state ^ xor_mask) & expected;
        Ok(if must_equal_expected != 0 {
            masked == expected
        } else {
            masked != 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SetFlag;
    use crate::choice::{create_choice, Scenario};
    use crate::game_state::testing::fresh_state;
    use crate::identity::{CharIndex, Royals};
    use crate::party::inventory::RATIONS;
    use crate::party::InventoryItem;
    use crate::time::Time;

    #[test]
    fn test_event_flag_choice() {
        let mut state = fresh_state();
        let set = Choice::EventFlag {
            event_ptr: 0x100,
            expected: true,
        };
        assert!(!state.evaluate_dialog_choice(&set).unwrap());
        state.set_event_value(0x100, 1).unwrap();
        assert!(state.evaluate_dialog_choice(&set).unwrap());
        assert!(!state
            .evaluate_dialog_choice(&Choice::EventFlag {
                event_ptr: 0x100,
                expected: false
            })
            .unwrap());
    }

    #[test]
    fn test_game_state_sentinel() {
        let mut state = fresh_state();
        state.set_context_value(500);
        assert!(state.evaluate_game_state_choice(ActiveStateFlag::Context, 10, UNBOUNDED));
        assert!(!state.evaluate_game_state_choice(ActiveStateFlag::Context, 10, 499));
        assert!(state.evaluate_game_state_choice(ActiveStateFlag::Context, 500, 500));
        assert!(!state.evaluate_game_state_choice(ActiveStateFlag::Context, 501, UNBOUNDED));
    }

    #[test]
    fn test_money_in_sovereigns() {
        let mut state = fresh_state();
        state.party_mut().set_gold(Royals(125));
        assert!(state.evaluate_game_state_choice(ActiveStateFlag::Money, 12, UNBOUNDED));
        assert!(!state.evaluate_game_state_choice(ActiveStateFlag::Money, 13, UNBOUNDED));

        state.set_item_value(Royals(200));
        assert!(state.evaluate_game_state_choice(ActiveStateFlag::CantAfford, 0, 0));
    }

    #[test]
    fn test_night_and_day() {
        let mut state = fresh_state();
        for (hour, night) in [(3, true), (4, false), (19, false), (20, true), (23, true)] {
            state.clock_mut().set_time(Time::from_hours(24 + hour));
            assert_eq!(
                state.evaluate_game_state_choice(ActiveStateFlag::NightTime, 1, UNBOUNDED),
                night,
                "hour {}",
                hour
            );
            assert_eq!(
                state.evaluate_game_state_choice(ActiveStateFlag::DayTime, 1, UNBOUNDED),
                !night
            );
        }
        state.clock_mut().set_time(Time::from_hours(14));
        assert!(state.evaluate_game_state_choice(ActiveStateFlag::TimeBetween, 12, 16));
    }

    #[test]
    fn test_chapter_choice_from_state_word() {
        let state = fresh_state();
        let choice = create_choice(0x7537, 1, 1);
        assert!(state.evaluate_dialog_choice(&choice).unwrap());
        let choice = create_choice(0x7537, 2, UNBOUNDED);
        assert!(!state.evaluate_dialog_choice(&choice).unwrap());
    }

    #[test]
    fn test_complex_whole_byte_masks() {
        let mut state = fresh_state();
        // whole byte pointer
        let ptr = 0xdac0;
        let mut flag = SetFlag::simple(ptr, 0);
        flag.event_data = 0b0000_0110;
        state.set_event_dialog_action(&flag).unwrap();

        let all = state
            .evaluate_complex_choice(ptr, 0, 0b0000_0110, 1)
            .unwrap();
        let any = state
            .evaluate_complex_choice(ptr, 0, 0b0000_0011, 0)
            .unwrap();
        let missing = state
            .evaluate_complex_choice(ptr, 0, 0b0000_0011, 1)
            .unwrap();
        let inverted = state
            .evaluate_complex_choice(ptr, 0b0000_0110, 0b0000_0110, 0)
            .unwrap();
        assert!(all);
        assert!(any);
        assert!(!missing);
        assert!(!inverted);
    }

    #[test]
    fn test_complex_bit_uses_range() {
        let mut state = fresh_state();
        // single bit of a complex byte
        let ptr = 0xdac3;
        assert_ne!(complex_location(ptr).1, 0);
        assert!(state.evaluate_complex_choice(ptr, 0, 0, 1).unwrap());
        assert!(!state.evaluate_complex_choice(ptr, 1, 2, 0).unwrap());
        state.set_event_value(ptr, 1).unwrap();
        assert!(state.evaluate_complex_choice(ptr, 1, 2, 1).unwrap());
    }

    #[test]
    fn test_inventory_and_notes() {
        let mut state = fresh_state();
        let has_rations = Choice::Inventory {
            item: RATIONS,
            present: true,
        };
        assert!(!state.evaluate_dialog_choice(&has_rations).unwrap());
        let owyn = state.party_mut().get_character_mut(CharIndex::OWYN).unwrap();
        owyn.inventory.add_item(InventoryItem::new(RATIONS, 2));
        owyn.inventory.add_item(InventoryItem::new(NOTE, 7));
        assert!(state.evaluate_dialog_choice(&has_rations).unwrap());
        assert!(state
            .evaluate_dialog_choice(&Choice::HaveNote { note: 7 })
            .unwrap());
        assert!(!state
            .evaluate_dialog_choice(&Choice::HaveNote { note: 8 })
            .unwrap());
    }

    #[test]
    fn test_presentation_choices_are_false() {
        let state = fresh_state();
        assert!(state.evaluate_dialog_choice(&Choice::NoChoice).unwrap());
        for choice in [
            Choice::Query { index: 0x100 },
            Choice::Random { range: 50 },
            Choice::Unknown { state: 0xf000 },
        ] {
            assert!(!state.evaluate_dialog_choice(&choice).unwrap());
        }
        assert!(!state
            .evaluate_dialog_choice(&Choice::CustomState {
                scenario: Scenario::Plagued
            })
            .unwrap());
    }
}
