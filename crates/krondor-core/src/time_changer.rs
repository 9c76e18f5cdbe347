//! Passing game time
//!
//! Every advance of the clock goes through
//! [`GameState::handle_game_time_change`]: daily upkeep when a day boundary
//! is crossed, hourly condition effects when an hour boundary is crossed,
//! then one reduce pass over the time expiring ledger.

use crate::error::{Error, Result};
use crate::game_state::GameState;
use crate::identity::CharIndex;
use crate::ledger::{ExpiringStateType, TimeExpiringState};
use crate::party::inventory::{POISONED_RATIONS, RATIONS, SPOILED_RATIONS, TORCH};
use crate::party::{Condition, ItemKind, SkillType};
use crate::spells::StaticSpell;
use crate::time::{Time, Times};
use log::{debug, info, warn};

/// How a stretch of time is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeChange {
    /// Warnings may interrupt the player
    pub can_display_dialog: bool,
    pub consume_rations: bool,
    pub is_not_sleeping: bool,
    /// Percent of maximum health restored per hour of rest
    pub heal_fraction: u8,
    /// Resting never heals past this percent of maximum health
    pub heal_percent_ceiling: u8,
}

impl TimeChange {
    /// Time passed inside a dialog
    pub const DIALOG: TimeChange = TimeChange {
        can_display_dialog: true,
        consume_rations: true,
        is_not_sleeping: false,
        heal_fraction: 0,
        heal_percent_ceiling: 0,
    };

    pub const WALKING: TimeChange = TimeChange {
        can_display_dialog: true,
        consume_rations: true,
        is_not_sleeping: true,
        heal_fraction: 0,
        heal_percent_ceiling: 0,
    };

    /// A night in camp
    pub const CAMPING: TimeChange = TimeChange {
        can_display_dialog: false,
        consume_rations: true,
        is_not_sleeping: false,
        heal_fraction: 1,
        heal_percent_ceiling: 80,
    };
}

/// Days between the small natural rise of health and stamina
const HEALTH_GROWTH_PERIOD_DAYS: u32 = 30;
const NEAR_DEATH_RECOVERY_PER_DAY: i32 = 10;
/// Hourly damage each character takes once awake too long, by roster index
const LACK_OF_SLEEP_DAMAGE: [i32; CharIndex::COUNT] = [-2, -1, -2, -2, -2, -3];
/// Full light level of a burning source
pub const FULL_LIGHT: u8 = 0x40;

/// Hourly effect of an active condition
struct ConditionEffect {
    health: i32,
    change: i32,
}

fn condition_effect(condition: Condition) -> ConditionEffect {
    let (health, change) = match condition {
        Condition::Sick => (-1, -1),
        Condition::Plagued => (-2, 0),
        Condition::Poisoned => (-2, -1),
        Condition::Drunk => (0, -5),
        Condition::Healing => (1, -2),
        Condition::Starving => (-1, 0),
        Condition::NearDeath => (0, 0),
    };
    ConditionEffect { health, change }
}

impl GameState {
    /// Split a dialog-requested span into hourly steps
    ///
    /// Each whole hour past the first is applied on its own, followed by
    /// the remainder. Spans over twelve hours count as rest: the
    /// last-slept time is moved up before every hourly step.
    pub fn elapse_time(&mut self, time: Time) -> Result<()> {
        let resets_sleep = time > Times::TWELVE_HOURS;
        let mut remaining = time;
        while remaining > Times::ONE_HOUR {
            if resets_sleep {
                let now = self.clock.time();
                self.clock.set_time_last_slept(now);
            }
            remaining = remaining - Times::ONE_HOUR;
            self.handle_game_time_change(Times::ONE_HOUR, TimeChange::DIALOG)?;
        }
        if !remaining.is_zero() {
            self.handle_game_time_change(remaining, TimeChange::DIALOG)?;
        }
        Ok(())
    }

    /// Advance the clock by `delta` and apply everything that depends on it
    pub fn handle_game_time_change(&mut self, delta: Time, change: TimeChange) -> Result<()> {
        let old = self.clock.time();
        self.clock.advance(delta);
        let new = self.clock.time();

        for day in old.days() + 1..=new.days() {
            self.on_new_day(day, change)?;
        }
        for _ in old.hours()..new.hours() {
            self.on_new_hour(change);
        }

        self.reduce_and_evaluate_time_expiring_state(delta)
    }

    fn on_new_day(&mut self, day: u32, change: TimeChange) -> Result<()> {
        debug!("day {} begins", day);
        if day % HEALTH_GROWTH_PERIOD_DAYS == 0 {
            for character in self.party.active_characters_mut() {
                character.skills.raise_maximum(SkillType::Health, 1);
                character.skills.raise_maximum(SkillType::Stamina, 1);
            }
        }
        if change.consume_rations {
            self.consume_rations()?;
        }
        for character in self.party.active_characters_mut() {
            if character.conditions.is_active(Condition::NearDeath) {
                character.adjust_condition(Condition::NearDeath, -NEAR_DEATH_RECOVERY_PER_DAY);
            }
        }
        Ok(())
    }

    fn consume_rations(&mut self) -> Result<()> {
        let eaters: Vec<CharIndex> = self.party.active_indices().to_vec();
        for eater in eaters {
            let ration = [RATIONS, SPOILED_RATIONS, POISONED_RATIONS]
                .into_iter()
                .find(|r| self.party.have_item(*r));
            if let Some(ration) = ration {
                // eat one's own food before anyone else's
                let own = self
                    .party
                    .character_mut(eater)
                    .map(|c| c.inventory.remove_units(ration, 1) == 1)
                    .unwrap_or(false);
                if !own {
                    self.party.remove_n_of_item(ration, 1)?;
                }
            }
            let Some(character) = self.party.character_mut(eater) else {
                continue;
            };
            match ration {
                Some(r) if r == RATIONS => character.adjust_condition(Condition::Starving, -100),
                Some(r) if r == SPOILED_RATIONS => {
                    character.adjust_condition(Condition::Starving, -100);
                    character.adjust_condition(Condition::Sick, 3);
                }
                Some(_) => character.adjust_condition(Condition::Poisoned, 4),
                None => character.adjust_condition(Condition::Starving, 5),
            }
        }
        Ok(())
    }

    fn on_new_hour(&mut self, change: TimeChange) {
        if change.is_not_sleeping {
            self.damage_due_to_lack_of_sleep(change.can_display_dialog);
        }
        self.effect_of_conditions_with_time(change);
    }

    fn damage_due_to_lack_of_sleep(&mut self, can_display_dialog: bool) {
        let awake = self.clock.time_since_last_slept();
        if awake >= Times::EIGHTEEN_HOURS {
            if can_display_dialog {
                warn!("party is exhausted after {} hours awake", awake.hours());
            }
            for character in self.party.active_characters_mut() {
                let damage = LACK_OF_SLEEP_DAMAGE
                    .get(usize::from(character.index.raw()))
                    .copied()
                    .unwrap_or(-2);
                character.skills.adjust_total_health(damage);
            }
        } else if awake >= Times::SEVENTEEN_HOURS && can_display_dialog {
            warn!("party is growing tired");
        }
    }

    fn effect_of_conditions_with_time(&mut self, change: TimeChange) {
        for character in self.party.active_characters_mut() {
            for condition in Condition::ALL {
                if !character.conditions.is_active(condition) {
                    continue;
                }
                let effect = condition_effect(condition);
                character.skills.adjust_total_health(effect.health);
                character.adjust_condition(condition, effect.change);
            }

            if !change.is_not_sleeping && change.heal_fraction > 0 {
                let max = i32::from(character.skills.max_total_health());
                let ceiling = max * i32::from(change.heal_percent_ceiling) / 100;
                let current = i32::from(character.skills.total_health());
                let heal = (max * i32::from(change.heal_fraction) / 100).max(1);
                if current < ceiling {
                    character.skills.adjust_total_health(heal.min(ceiling - current));
                }
            }
        }
    }

    /// Decay every timed effect by `delta` and apply the ones that changed
    ///
    /// Entries are visited in creation order and removed in one sweep after
    /// the pass. Entries added by side effects of this pass are not visited
    /// until the next one.
    pub fn reduce_and_evaluate_time_expiring_state(&mut self, delta: Time) -> Result<()> {
        let count = self.ledger.len();
        let mut light = None;
        for index in 0..count {
            let Some(before) = self.ledger.entries().get(index).map(|e| e.duration) else {
                break;
            };
            let Some(entry) = self.ledger.decay(index, delta) else {
                break;
            };
            let expired_now = !before.is_zero() && entry.duration.is_zero();
            match entry.kind {
                ExpiringStateType::Light => {
                    light = light.max(Some(light_level(&entry)));
                    if expired_now {
                        self.deactivate_light_source();
                    }
                }
                ExpiringStateType::Spell => {
                    self.spell_state.set(entry.data, !entry.duration.is_zero());
                }
                ExpiringStateType::SetState if entry.duration.is_zero() => {
                    self.set_event_value(entry.data, 1)?;
                }
                ExpiringStateType::ResetState if entry.duration.is_zero() => {
                    self.set_event_value(entry.data, 0)?;
                }
                _ => {}
            }
        }
        if let Some(level) = light {
            self.light_intensity = level;
        }
        self.ledger.remove_expired();
        Ok(())
    }

    /// Burn down the first equipped light among active characters
    ///
    /// Returns whether a light was found.
    pub fn deactivate_light_source(&mut self) -> bool {
        self.light_intensity = 0;
        for character in self.party.active_characters_mut() {
            let Some(pos) = character.inventory.equipped_light() else {
                continue;
            };
            let item = &mut character.inventory.items_mut()[pos];
            item.quantity = item.quantity.saturating_sub(1);
            item.equipped = false;
            let burnt_out = item.item == TORCH && item.quantity == 0;
            info!("{}'s light goes out", character.name);
            if burnt_out {
                character.inventory.remove_at(pos);
            }
            return true;
        }
        false
    }

    /// Light an equipped source for `duration`
    pub fn add_light_time_expiring_state(&mut self, light: u16, duration: Time) -> Result<()> {
        if self.ledger.add_light(light, duration).is_none() {
            return Err(Error::invalid("time expiring ledger is full"));
        }
        if let Some(entry) = self.ledger.find(ExpiringStateType::Light, light) {
            self.light_intensity = light_level(entry);
        }
        Ok(())
    }

    pub fn cast_static_spell(&mut self, spell: StaticSpell, duration: Time) -> Result<()> {
        if self.ledger.add_spell(spell.raw(), duration).is_none() {
            return Err(Error::invalid("time expiring ledger is full"));
        }
        self.spell_state.set(spell.raw(), true);
        Ok(())
    }

    pub fn get_spell_active(&self, spell: StaticSpell) -> bool {
        self.spell_state.is_active(spell.raw())
    }

    pub fn have_active_light_source(&self) -> bool {
        self.ledger.has_active(ExpiringStateType::Light)
            && self
                .party
                .active_characters()
                .any(|c| c.inventory.equipped_light().is_some())
    }

    /// Drop every burning light and spell glow
    pub fn extinguish_all_light_sources(&mut self) {
        self.ledger.remove_kind(ExpiringStateType::Light);
        for character in self.party.active_characters_mut() {
            for item in character.inventory.items_mut() {
                if item.kind() == ItemKind::Light {
                    item.equipped = false;
                }
            }
        }
        self.light_intensity = 0;
    }
}

/// Light level of a source with this much time left
fn light_level(entry: &TimeExpiringState) -> u8 {
    if entry.duration >= Times::ONE_HOUR {
        FULL_LIGHT
    } else {
        (entry.duration.raw() * u32::from(FULL_LIGHT) / Times::ONE_HOUR.raw()) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::testing::fresh_state;
    use crate::party::inventory::{LANTERN, TORCH};
    use crate::party::InventoryItem;

    fn equip_torch(state: &mut GameState, charges: u16) {
        state
            .party_mut()
            .get_character_mut(CharIndex::LOCKLEAR)
            .unwrap()
            .inventory
            .add_item(InventoryItem::new(TORCH, charges).equipped());
    }

    #[test]
    fn test_light_expiry_deactivates_once() {
        let mut state = fresh_state();
        equip_torch(&mut state, 2);
        state.add_light_time_expiring_state(0, Time(30)).unwrap();

        state.reduce_and_evaluate_time_expiring_state(Time(30)).unwrap();
        assert!(state.ledger().is_empty());
        let locklear = state.party().character(CharIndex::LOCKLEAR).unwrap();
        let torch = locklear.inventory.items()[0];
        assert_eq!(torch.quantity, 1);
        assert!(!torch.equipped);

        state.reduce_and_evaluate_time_expiring_state(Time(30)).unwrap();
        let torch = state.party().character(CharIndex::LOCKLEAR).unwrap().inventory.items()[0];
        assert_eq!(torch.quantity, 1);
    }

    #[test]
    fn test_last_torch_charge_removes_item() {
        let mut state = fresh_state();
        equip_torch(&mut state, 1);
        state.add_light_time_expiring_state(0, Time(10)).unwrap();
        state.reduce_and_evaluate_time_expiring_state(Time(60)).unwrap();
        assert!(!state.party().have_item(TORCH));
    }

    #[test]
    fn test_lantern_is_kept_when_empty() {
        let mut state = fresh_state();
        state
            .party_mut()
            .get_character_mut(CharIndex::OWYN)
            .unwrap()
            .inventory
            .add_item(InventoryItem::new(LANTERN, 1).equipped());
        state.add_light_time_expiring_state(1, Time(10)).unwrap();
        state.reduce_and_evaluate_time_expiring_state(Time(10)).unwrap();
        assert!(state.party().have_item(LANTERN));
    }

    #[test]
    fn test_light_fades_in_last_hour() {
        let mut state = fresh_state();
        equip_torch(&mut state, 3);
        state
            .add_light_time_expiring_state(0, Times::ONE_HOUR + Time(900))
            .unwrap();
        assert_eq!(state.light_intensity(), FULL_LIGHT);
        assert!(state.have_active_light_source());

        state.reduce_and_evaluate_time_expiring_state(Time(1800)).unwrap();
        assert_eq!(state.light_intensity(), FULL_LIGHT / 2);
    }

    #[test]
    fn test_scheduled_flags_fire_at_zero() {
        let mut state = fresh_state();
        state
            .ledger
            .add(ExpiringStateType::SetState, 0x40, 0, Time(100));
        state.set_event_value(0x41, 1).unwrap();
        state
            .ledger
            .add(ExpiringStateType::ResetState, 0x41, 0, Time(200));

        state.reduce_and_evaluate_time_expiring_state(Time(100)).unwrap();
        assert!(state.read_event_bool(0x40).unwrap());
        assert!(state.read_event_bool(0x41).unwrap());
        assert_eq!(state.ledger().len(), 1);

        state.reduce_and_evaluate_time_expiring_state(Time(500)).unwrap();
        assert!(!state.read_event_bool(0x41).unwrap());
        assert!(state.ledger().is_empty());
    }

    #[test]
    fn test_spell_bit_tracks_duration() {
        let mut state = fresh_state();
        state
            .cast_static_spell(StaticSpell::ScentOfSarig, Time(50))
            .unwrap();
        assert!(state.get_spell_active(StaticSpell::ScentOfSarig));
        state.reduce_and_evaluate_time_expiring_state(Time(49)).unwrap();
        assert!(state.get_spell_active(StaticSpell::ScentOfSarig));
        state.reduce_and_evaluate_time_expiring_state(Time(1)).unwrap();
        assert!(!state.get_spell_active(StaticSpell::ScentOfSarig));
        assert!(state.ledger().is_empty());
    }

    #[test]
    fn test_elapse_time_steps_hourly() {
        let mut state = fresh_state();
        state.clock_mut().set_time(Time::from_hours(8));
        state
            .ledger
            .add(ExpiringStateType::SetState, 0x50, 0, Times::ONE_HOUR);
        state.elapse_time(Time::from_hours(3) + Time(600)).unwrap();
        assert_eq!(state.clock().time(), Time::from_hours(11) + Time(600));
        assert!(state.read_event_bool(0x50).unwrap());
        // three hours do not reset the sleep timer
        assert_eq!(state.clock().time_last_slept(), Time::from_hours(8));
    }

    #[test]
    fn test_long_elapse_resets_sleep() {
        let mut state = fresh_state();
        state.clock_mut().set_time(Time::from_hours(8));
        state.elapse_time(Time::from_hours(13)).unwrap();
        // the last whole hour runs as the remainder, after the final reset
        assert_eq!(state.clock().time(), Time::from_hours(21));
        assert_eq!(state.clock().time_last_slept(), Time::from_hours(19));
    }

    #[test]
    fn test_rations_eaten_each_day() {
        let mut state = fresh_state();
        state
            .party_mut()
            .get_character_mut(CharIndex::LOCKLEAR)
            .unwrap()
            .inventory
            .add_item(InventoryItem::new(RATIONS, 2));
        state.clock_mut().set_time(Time::from_hours(23));
        state
            .handle_game_time_change(Times::ONE_HOUR, TimeChange::DIALOG)
            .unwrap();

        let party = state.party();
        assert_eq!(party.item_count(RATIONS), 0);
        for character in party.active_characters() {
            let starving = character.conditions.get(Condition::Starving);
            if character.index == CharIndex::GORATH {
                assert_eq!(starving, 5);
            } else {
                assert_eq!(starving, 0);
            }
        }
    }

    #[test]
    fn test_shared_rations_are_eaten_from_any_pack() {
        let mut state = fresh_state();
        state
            .party_mut()
            .keys_mut()
            .add_item(InventoryItem::new(RATIONS, 1));
        state.clock_mut().set_time(Time::from_hours(23));
        state
            .handle_game_time_change(Times::ONE_HOUR, TimeChange::DIALOG)
            .unwrap();

        assert_eq!(state.party().item_count(RATIONS), 0);
        let locklear = state.party().character(CharIndex::LOCKLEAR).unwrap();
        assert_eq!(locklear.conditions.get(Condition::Starving), 0);
    }

    #[test]
    fn test_lack_of_sleep_hurts_walkers() {
        let mut state = fresh_state();
        state.clock_mut().set_time(Time::ZERO);
        state.clock_mut().advance(Time::from_hours(18));
        let before = state
            .party()
            .character(CharIndex::PATRUS)
            .map(|c| c.skills.total_health());
        state
            .party_mut()
            .set_active_characters(vec![CharIndex::PATRUS])
            .unwrap();
        state
            .handle_game_time_change(Times::ONE_HOUR, TimeChange::WALKING)
            .unwrap();
        let after = state
            .party()
            .character(CharIndex::PATRUS)
            .map(|c| c.skills.total_health());
        assert_eq!(after, before.map(|h| h - 3));
    }
}
