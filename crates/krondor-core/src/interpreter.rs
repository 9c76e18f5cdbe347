//! Dialog action interpreter
//!
//! [`GameState::evaluate_action`] applies one [`DialogAction`] to the game
//! state. Actions are read-only inputs; all mutation goes through the event
//! store, the ledger and the party.
//!
//! There is no rollback: when an action fails partway, whatever it already
//! changed stays changed.

use crate::action::{DialogAction, SetFlag, SpecialActionType};
use crate::error::{Error, Result};
use crate::game_state::GameState;
use crate::identity::{CharIndex, Royals};
use crate::ledger::{ExpiringStateType, FLAG_ALLOW_DUPLICATE};
use crate::party::inventory::{self, FULL_CONDITION};
use crate::party::{InventoryItem, ItemKind};
use crate::state::{self, EventPointer};
use log::{debug, info, warn};

/// Pseudo-pointer that stores the flag value into the item value
const ITEM_VALUE_POINTER: EventPointer = 0x753e;
/// Pseudo-pointer that stores the flag value into the context variable
const CONTEXT_VAR_POINTER: EventPointer = 0x753f;
/// Rolls for skill and condition gains are drawn from `0..=ROLL_LIMIT`
const ROLL_LIMIT: u32 = 0xfff;
/// A heal of this many percent also cures every condition
const FULL_HEAL: u16 = 100;

impl GameState {
    /// Apply a list of actions in order
    ///
    /// Recoverable failures are logged and skipped; a corrupt save aborts
    /// the rest of the list.
    pub fn evaluate_actions(&mut self, actions: &[DialogAction]) -> Result<()> {
        for action in actions {
            if let Err(err) = self.evaluate_action(action) {
                if err.is_corruption() {
                    return Err(err);
                }
                warn!("skipping dialog action {:?}: {}", action, err);
            }
        }
        Ok(())
    }

    pub fn evaluate_action(&mut self, action: &DialogAction) -> Result<()> {
        debug!("evaluating {:?}", action);
        match action {
            DialogAction::PushNextDialog { target } => {
                self.pending_dialogs.push(*target);
            }
            DialogAction::SetFlag(flag) => self.set_flag(flag)?,
            DialogAction::GiveItem {
                item,
                who,
                quantity,
            } => {
                let given = InventoryItem::new(*item, *quantity);
                if *who <= 1 || inventory::money_value(*item, 0).is_some() {
                    self.party.gain_item(given)?;
                } else {
                    let index = self.selected_character(who - 2)?;
                    let character = self.party.get_character_mut(index)?;
                    if !character.inventory.add_item(given) {
                        return Err(Error::invalid(format!(
                            "{} has no room for {}",
                            character.name, item
                        )));
                    }
                }
            }
            DialogAction::LoseItem { item, quantity } => {
                self.party.remove_item(*item, u32::from(*quantity))?;
            }
            DialogAction::LoseNOfItem { item, quantity } => {
                self.party.remove_n_of_item(*item, u32::from(*quantity))?;
            }
            DialogAction::GainSkill {
                who,
                skill,
                min,
                max,
            } => {
                let amount = self.roll_amount(*min, *max);
                for index in self.dialog_targets(*who)? {
                    debug!("{} gains {} {:?}", index, amount, skill);
                    self.party.get_character_mut(index)?.improve_skill(*skill, amount);
                }
            }
            DialogAction::GainCondition {
                who,
                condition,
                min,
                max,
            } => {
                let amount = self.roll_amount(*min, *max);
                for index in self.dialog_targets(*who)? {
                    debug!("{} gains {} {:?}", index, amount, condition);
                    self.party
                        .get_character_mut(index)?
                        .adjust_condition(*condition, amount);
                }
            }
            DialogAction::HealCharacters { who, amount } => {
                for index in self.dialog_targets(*who)? {
                    let character = self.party.get_character_mut(index)?;
                    if *amount >= FULL_HEAL {
                        character.conditions.clear();
                        character.skills.heal_fully();
                    } else {
                        let max = i32::from(character.skills.max_total_health());
                        character
                            .skills
                            .adjust_total_health(max * i32::from(*amount) / 100);
                    }
                }
            }
            DialogAction::ElapseTime { time } => self.elapse_time(*time)?,
            DialogAction::SetAddResetState {
                event_ptr,
                time_to_expire,
            } => {
                self.set_event_value(*event_ptr, 1)?;
                self.add_time_expiring_state(
                    ExpiringStateType::ResetState,
                    *event_ptr,
                    FLAG_ALLOW_DUPLICATE,
                    *time_to_expire,
                )?;
            }
            DialogAction::SetTimeExpiringState {
                kind,
                flags,
                event_ptr,
                time_to_expire,
            } => {
                self.add_time_expiring_state(*kind, *event_ptr, *flags, *time_to_expire)?;
            }
            DialogAction::SetEndOfDialogState { state } => {
                self.end_of_dialog_state = *state;
            }
            DialogAction::UpdateCharacters { characters } => {
                self.party.set_active_characters(characters.clone())?;
            }
            DialogAction::LoadSkillValue { target, skill } => {
                let (character, value) = self
                    .party
                    .get_skill(*skill, *target == 1)
                    .ok_or_else(|| Error::invalid("no active character to test a skill"))?;
                self.skill_checked_character = Some(character);
                self.skill_value = value;
            }
            DialogAction::LearnSpell { who, spell } => {
                let index = self.selected_character(*who)?;
                let character = self.party.get_character_mut(index)?;
                if !character.spells.learn(*spell) {
                    return Err(Error::invalid(format!(
                        "spell {} is out of range",
                        spell.0
                    )));
                }
                info!("{} learns spell {}", character.name, spell.0);
            }
            DialogAction::SpecialAction {
                kind,
                var1,
                var2,
                var3,
            } => self.special_action(*kind, *var1, *var2, *var3)?,
            DialogAction::SetTextVariable { which, what } => {
                self.set_text_variable(*which, *what)?;
            }
            DialogAction::UnknownAction { kind, data } => {
                debug!("ignoring unknown action {:#x} ({} bytes)", kind, data.len());
            }
        }
        Ok(())
    }

    fn set_flag(&mut self, flag: &SetFlag) -> Result<()> {
        match flag.event_pointer {
            ITEM_VALUE_POINTER => {
                self.item_value = Royals(u32::from(flag.event_value));
                Ok(())
            }
            CONTEXT_VAR_POINTER => {
                self.context_var = u32::from(flag.event_value);
                Ok(())
            }
            _ => self.set_event_dialog_action(flag),
        }
    }

    /// `max` when the bounds agree, otherwise a roll in `[min, max)`
    fn roll_amount(&mut self, min: i16, max: i16) -> i32 {
        if min == max {
            return i32::from(max);
        }
        let span = i32::from(max) - i32::from(min);
        let roll = self.get_random_number(0, ROLL_LIMIT) as i32;
        i32::from(min) + roll.rem_euclid(span)
    }

    /// Characters addressed by a dialog `who` operand
    ///
    /// 0 and 1 mean every active member. Larger values index the selection
    /// table from slot `who - 2`.
    fn dialog_targets(&self, who: u8) -> Result<Vec<CharIndex>> {
        if who <= 1 {
            Ok(self.party.active_indices().to_vec())
        } else {
            Ok(vec![self.selected_character(who - 2)?])
        }
    }

    fn add_time_expiring_state(
        &mut self,
        kind: ExpiringStateType,
        data: u16,
        flags: u8,
        duration: crate::time::Time,
    ) -> Result<()> {
        self.ledger
            .add(kind, data, flags, duration)
            .map(|_| ())
            .ok_or_else(|| Error::invalid("time expiring ledger is full"))
    }

    fn special_action(&mut self, kind: SpecialActionType, var1: u16, var2: u16, var3: u16) -> Result<()> {
        match kind {
            SpecialActionType::ReduceGold => self.party.lose_gold(self.item_value),
            SpecialActionType::IncreaseGold => self.party.gain_gold(self.item_value),
            SpecialActionType::RepairAllEquippedArmor => {
                for character in self.party.active_characters_mut() {
                    for item in character.inventory.items_mut() {
                        if item.equipped && item.kind() == ItemKind::Armor {
                            item.quantity = FULL_CONDITION;
                        }
                    }
                }
            }
            SpecialActionType::ResetCombatState => {
                self.write_save(|save| state::encounter::set_combat_encounter_state(save, var1, false))?;
            }
            SpecialActionType::SetCombatState => {
                self.write_save(|save| state::encounter::set_combat_encounter_state(save, var1, true))?;
            }
            SpecialActionType::Increase753f => {
                self.context_var = self.context_var.saturating_add(u32::from(var1));
            }
            SpecialActionType::Gamble => self.gamble(var1, var2, var3),
            SpecialActionType::ResetGambleValueTo => {
                self.bard_reward = Royals(u32::from(var1));
            }
            SpecialActionType::ExtinguishAllLightSources => self.extinguish_all_light_sources(),
            SpecialActionType::UnifyOwynAndPugsSpells => {
                let owyn = self.party.get_character_mut(CharIndex::OWYN)?.spells;
                let pug = self.party.get_character_mut(CharIndex::PUG)?.spells;
                let unified = owyn.union(&pug);
                self.party.get_character_mut(CharIndex::OWYN)?.spells = unified;
                self.party.get_character_mut(CharIndex::PUG)?.spells = unified;
            }
            SpecialActionType::CopyStandardInnToShop0
            | SpecialActionType::CopyStandardInnToShop1
            | SpecialActionType::RepairAndBlessEquippedSwords
            | SpecialActionType::ReturnAlcoholToShops
            | SpecialActionType::BeginCombat
            | SpecialActionType::EmptyArlieContainer
            | SpecialActionType::CheatIncreaseSkill
            | SpecialActionType::Unknown(_) => {
                debug!("special action {:?} has no effect here", kind);
            }
        }
        Ok(())
    }

    /// One round of dice against a gambler
    ///
    /// The party wins when its roll beats the gambler's; a win pays
    /// `reward` and raises the pot by the same amount. The outcome is left
    /// in the context value.
    fn gamble(&mut self, player_chance: u16, gambler_chance: u16, reward: u16) {
        let player = self.get_random_number(0, ROLL_LIMIT) % u32::from(player_chance.max(1));
        let gambler = self.get_random_number(0, ROLL_LIMIT) % u32::from(gambler_chance.max(1));
        if player > gambler {
            let reward = Royals(u32::from(reward));
            self.party.gain_gold(reward);
            self.bard_reward = self.bard_reward.saturating_add(reward);
            self.context_value = 1;
        } else {
            self.context_value = 0;
        }
        debug!("gamble {} against {}, context {}", player, gambler, self.context_value);
    }

    fn set_text_variable(&mut self, which: u8, what: u8) -> Result<()> {
        let text = match what {
            0x7 | 0xb..=0xf => return self.set_dialog_text_variable(which, what),
            0x11 => self
                .current_monster
                .and_then(|m| self.content.monster_name(m))
                .unwrap_or("no monster")
                .to_string(),
            0x12 => self.selected_item_name()?.to_string(),
            0x13 | 0x19 => self.item_value.to_string(),
            0x1c => "shopkeeper".to_string(),
            other => {
                debug!("text variable {} ignores source {:#x}", which, other);
                return Ok(());
            }
        };
        self.text_variables.set_text_variable(usize::from(which), text);
        Ok(())
    }
}
