//! Dialog choices
//!
//! A [`Choice`] is a side-effect free predicate gating a dialog branch or
//! an encounter. Save data encodes choices as one 16-bit state word plus
//! two operand words; [`create_choice`] decodes them by range.

use crate::identity::ItemIndex;
use crate::state::EventPointer;
use serde::{Deserialize, Serialize};

/// Scalars of the running game that a [`Choice::GameState`] can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ActiveStateFlag {
    Context = 0x7530,
    Money = 0x7531,
    CantAfford = 0x7533,
    Chapter = 0x7537,
    NightTime = 0x7539,
    DayTime = 0x753a,
    TimeBetween = 0x753c,
    SkillCheck = 0x753d,
    ItemValue = 0x753e,
    ContextVar = 0x753f,
    Shop = 0x7542,
    Zone = 0x7543,
    Gambler = 0x754d,
}

impl ActiveStateFlag {
    pub fn from_raw(raw: u16) -> Option<Self> {
        use ActiveStateFlag::*;
        Some(match raw {
            0x7530 => Context,
            0x7531 => Money,
            0x7533 => CantAfford,
            0x7537 => Chapter,
            0x7539 => NightTime,
            0x753a => DayTime,
            0x753c => TimeBetween,
            0x753d => SkillCheck,
            0x753e => ItemValue,
            0x753f => ContextVar,
            0x7542 => Shop,
            0x7543 => Zone,
            0x754d => Gambler,
            _ => return None,
        })
    }

    pub fn raw(self) -> u16 {
        self as u16
    }
}

/// Scripted party predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    MortificationOfTheFlesh,
    Plagued,
    HaveSixSuitsOfArmor,
    AllPartyArmorIsGoodCondition,
    PoisonedDelekhanArmyChests,
    AnyCharacterSansWeapon,
    AnyCharacterHasNegativeCondition,
    AnyCharacterIsUnhealthy,
    AllPartyMembersHaveNapthaMask,
    NormalFoodInArlieChest,
    PoisonedFoodInArlieChest,
}

impl Scenario {
    pub fn from_raw(raw: u16) -> Option<Self> {
        use Scenario::*;
        Some(match raw {
            0 => MortificationOfTheFlesh,
            1 => Plagued,
            2 => HaveSixSuitsOfArmor,
            3 => AllPartyArmorIsGoodCondition,
            4 => PoisonedDelekhanArmyChests,
            5 => AnyCharacterSansWeapon,
            6 => AnyCharacterHasNegativeCondition,
            7 => AnyCharacterIsUnhealthy,
            8 => AllPartyMembersHaveNapthaMask,
            9 => NormalFoodInArlieChest,
            10 => PoisonedFoodInArlieChest,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    NoChoice,
    /// Presented as a conversation topic; resolved by the presentation layer
    Conversation { event_ptr: EventPointer },
    /// Presented as a yes/no query; resolved by the presentation layer
    Query { index: u16 },
    EventFlag {
        event_ptr: EventPointer,
        expected: bool,
    },
    GameState {
        state: ActiveStateFlag,
        min: u16,
        max: u16,
    },
    CustomState { scenario: Scenario },
    Inventory { item: ItemIndex, present: bool },
    HaveNote { note: u16 },
    CastSpell { spell: u16 },
    /// Rolled by the presentation layer
    Random { range: u16 },
    ComplexEvent {
        event_ptr: EventPointer,
        xor_mask: u8,
        expected: u8,
        must_equal_expected: u8,
        chapter_mask: u8,
    },
    Unknown { state: u16 },
}

/// Upper bounds (inclusive) of each state word category
pub mod mask {
    pub const NO_CHOICE: u16 = 0;
    pub const CONVERSATION: u16 = 0xab;
    pub const QUERY: u16 = 0x1ff;
    pub const EVENT_FLAG: u16 = 0x1fff;
    pub const GAME_STATE: u16 = 0x75ff;
    pub const CUSTOM_STATE: u16 = 0x9cff;
    pub const INVENTORY: u16 = 0xc3ff;
    pub const HAVE_NOTE: u16 = 0xc7ff;
    pub const CAST_SPELL: u16 = 0xcbff;
    pub const RANDOM: u16 = 0xcfff;
    pub const COMPLEX_EVENT: u16 = 0xdfff;
}

/// Decode a stored choice
pub fn create_choice(state: u16, choice0: u16, choice1: u16) -> Choice {
    match state {
        mask::NO_CHOICE => Choice::NoChoice,
        s if s <= mask::CONVERSATION => Choice::Conversation { event_ptr: s },
        s if s <= mask::QUERY => Choice::Query { index: s },
        s if s <= mask::EVENT_FLAG => Choice::EventFlag {
            event_ptr: s,
            expected: choice0 != 0,
        },
        s if s <= mask::GAME_STATE => match ActiveStateFlag::from_raw(s) {
            Some(flag) => Choice::GameState {
                state: flag,
                min: choice0,
                max: choice1,
            },
            None => Choice::Unknown { state: s },
        },
        s if s <= mask::CUSTOM_STATE => match Scenario::from_raw(s & !0x9c40) {
            Some(scenario) => Choice::CustomState { scenario },
            None => Choice::Unknown { state: s },
        },
        s if s <= mask::INVENTORY => Choice::Inventory {
            item: ItemIndex(s.wrapping_add(0x3cb0) as u8),
            present: choice0 != 0,
        },
        s if s <= mask::HAVE_NOTE => Choice::HaveNote {
            note: s.wrapping_add(0x38c8),
        },
        s if s <= mask::CAST_SPELL => Choice::CastSpell {
            spell: s.wrapping_sub(0xcb21),
        },
        s if s <= mask::RANDOM => Choice::Random {
            range: s.wrapping_add(0x30f8),
        },
        s if s <= mask::COMPLEX_EVENT => {
            let [xor_mask, expected] = choice0.to_le_bytes();
            let [must_equal_expected, chapter_mask] = choice1.to_le_bytes();
            Choice::ComplexEvent {
                event_ptr: s,
                xor_mask,
                expected,
                must_equal_expected,
                chapter_mask,
            }
        }
        s => Choice::Unknown { state: s },
    }
}
