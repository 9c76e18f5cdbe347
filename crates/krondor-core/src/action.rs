//! Dialog actions
//!
//! Each dialog node carries a list of actions applied in order when the
//! node is shown. The set of actions is closed; evaluation lives in
//! [`interpreter`](crate::interpreter).

use crate::dialog::Target;
use crate::identity::{CharIndex, ItemIndex, SpellIndex};
use crate::ledger::ExpiringStateType;
use crate::party::{Condition, SkillType};
use crate::state::EventPointer;
use crate::time::Time;
use serde::{Deserialize, Serialize};

/// Payload of a flag write
///
/// For a whole-byte complex pointer the byte becomes
/// `((old & event_mask) | event_data) ^ always_zero`. Otherwise each
/// non-zero pointer among `event_pointer`, `event_data:event_mask` and
/// `always_zero` is set to `event_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFlag {
    pub event_pointer: EventPointer,
    #[serde(default)]
    pub event_mask: u8,
    #[serde(default)]
    pub event_data: u8,
    #[serde(default)]
    pub always_zero: u16,
    pub event_value: u16,
}

impl SetFlag {
    /// A plain single-flag write
    pub fn simple(event_pointer: EventPointer, event_value: u16) -> Self {
        Self {
            event_pointer,
            event_mask: 0,
            event_data: 0,
            always_zero: 0,
            event_value,
        }
    }
}

/// Sub-kinds of [`DialogAction::SpecialAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialActionType {
    ReduceGold,
    IncreaseGold,
    RepairAllEquippedArmor,
    ResetCombatState,
    SetCombatState,
    CopyStandardInnToShop0,
    CopyStandardInnToShop1,
    Increase753f,
    Gamble,
    RepairAndBlessEquippedSwords,
    ReturnAlcoholToShops,
    ResetGambleValueTo,
    BeginCombat,
    ExtinguishAllLightSources,
    EmptyArlieContainer,
    CheatIncreaseSkill,
    UnifyOwynAndPugsSpells,
    Unknown(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Queue another snippet for the presentation layer
    PushNextDialog { target: Target },
    SetFlag(SetFlag),
    GiveItem {
        item: ItemIndex,
        who: u8,
        quantity: u16,
    },
    LoseItem { item: ItemIndex, quantity: u16 },
    LoseNOfItem { item: ItemIndex, quantity: u16 },
    GainSkill {
        who: u8,
        skill: SkillType,
        min: i16,
        max: i16,
    },
    GainCondition {
        who: u8,
        condition: Condition,
        min: i16,
        max: i16,
    },
    HealCharacters { who: u8, amount: u16 },
    ElapseTime { time: Time },
    SetAddResetState {
        event_ptr: EventPointer,
        time_to_expire: Time,
    },
    SetTimeExpiringState {
        kind: ExpiringStateType,
        flags: u8,
        event_ptr: EventPointer,
        time_to_expire: Time,
    },
    SetEndOfDialogState { state: i16 },
    UpdateCharacters { characters: Vec<CharIndex> },
    LoadSkillValue { target: u8, skill: SkillType },
    LearnSpell { who: u8, spell: SpellIndex },
    SpecialAction {
        kind: SpecialActionType,
        #[serde(default)]
        var1: u16,
        #[serde(default)]
        var2: u16,
        #[serde(default)]
        var3: u16,
    },
    SetTextVariable { which: u8, what: u8 },
    UnknownAction {
        kind: u16,
        #[serde(default)]
        data: Vec<u8>,
    },
}
