//! The party: roster, active members, purse and shared key ring
//!
//! This is the mutation surface the interpreter drives. Characters are
//! addressed by [`CharIndex`]; only active members take part in dialogs
//! and time effects.

mod character;
mod condition;
pub mod inventory;
mod skills;

pub use character::{Character, Spells};
pub use condition::{Condition, Conditions, CONDITION_MAX};
pub use inventory::{Inventory, InventoryItem, ItemInfo, ItemKind};
pub use skills::{Skill, SkillType, Skills, SKILL_CAP};

use crate::error::{Error, Result};
use crate::identity::{CharIndex, Chapter, ItemIndex, Royals};
use serde::{Deserialize, Serialize};

/// Leader of each chapter's party when Pug is absent
const CHAPTER_LEADERS: [CharIndex; 9] = [
    CharIndex::LOCKLEAR,
    CharIndex::JAMES,
    CharIndex::JAMES,
    CharIndex::GORATH,
    CharIndex::JAMES,
    CharIndex::OWYN,
    CharIndex::JAMES,
    CharIndex::OWYN,
    CharIndex::PUG,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    gold: Royals,
    characters: Vec<Character>,
    active: Vec<CharIndex>,
    #[serde(default)]
    keys: Inventory,
}

impl Party {
    /// Build a party; every active index must name a roster member
    pub fn new(characters: Vec<Character>, active: Vec<CharIndex>) -> Result<Self> {
        let mut party = Self {
            gold: Royals::default(),
            characters,
            active: Vec::new(),
            keys: Inventory::default(),
        };
        party.set_active_characters(active)?;
        Ok(party)
    }

    pub fn gold(&self) -> Royals {
        self.gold
    }

    pub fn set_gold(&mut self, gold: Royals) {
        self.gold = gold;
    }

    pub fn gain_gold(&mut self, amount: Royals) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn lose_gold(&mut self, amount: Royals) {
        self.gold = self.gold.saturating_sub(amount);
    }

    pub fn keys(&self) -> &Inventory {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut Inventory {
        &mut self.keys
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character(&self, index: CharIndex) -> Option<&Character> {
        self.characters.iter().find(|c| c.index == index)
    }

    pub fn character_mut(&mut self, index: CharIndex) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.index == index)
    }

    /// Like [`Party::character_mut`] but an unknown index is an error
    pub fn get_character_mut(&mut self, index: CharIndex) -> Result<&mut Character> {
        self.character_mut(index)
            .ok_or_else(|| Error::invalid(format!("no character {} in party", index)))
    }

    pub fn active_indices(&self) -> &[CharIndex] {
        &self.active
    }

    pub fn num_active(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, index: CharIndex) -> bool {
        self.active.contains(&index)
    }

    /// Active characters in party order
    pub fn active_characters(&self) -> impl Iterator<Item = &Character> {
        self.active.iter().filter_map(|i| self.character(*i))
    }

    /// Active characters in party order
    pub fn active_characters_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        let mut remaining: Vec<&mut Character> = self.characters.iter_mut().collect();
        let mut ordered = Vec::with_capacity(self.active.len());
        for index in &self.active {
            if let Some(pos) = remaining.iter().position(|c| c.index == *index) {
                ordered.push(remaining.swap_remove(pos));
            }
        }
        ordered.into_iter()
    }

    pub fn set_active_characters(&mut self, active: Vec<CharIndex>) -> Result<()> {
        if let Some(missing) = active.iter().find(|i| self.character(**i).is_none()) {
            return Err(Error::invalid(format!(
                "cannot activate {}: not in roster",
                missing
            )));
        }
        self.active = active;
        Ok(())
    }

    pub fn first_active(&self) -> Option<CharIndex> {
        self.active.first().copied()
    }

    /// Pug leads whenever he travels with the party
    pub fn party_leader(&self, chapter: Chapter) -> CharIndex {
        if self.is_active(CharIndex::PUG) {
            return CharIndex::PUG;
        }
        let slot = usize::from(chapter.raw().clamp(1, 9) - 1);
        CHAPTER_LEADERS[slot]
    }

    pub fn have_item(&self, item: ItemIndex) -> bool {
        self.keys.have_item(item) || self.active_characters().any(|c| c.inventory.have_item(item))
    }

    pub fn item_count(&self, item: ItemIndex) -> u32 {
        self.keys.count(item)
            + self
                .active_characters()
                .map(|c| c.inventory.count(item))
                .sum::<u32>()
    }

    /// Give an item to the first active character with room for it
    ///
    /// Sovereigns and royals go to the purse instead; no character
    /// receives them.
    pub fn gain_item(&mut self, item: InventoryItem) -> Result<Option<CharIndex>> {
        if let Some(value) = inventory::money_value(item.item, u32::from(item.quantity)) {
            self.gain_gold(value);
            return Ok(None);
        }
        let receiver = self
            .active_characters_mut()
            .find(|c| c.inventory.can_add(&item))
            .ok_or_else(|| Error::invalid(format!("no room in party for {}", item.item)))?;
        receiver.inventory.add_item(item);
        Ok(Some(receiver.index))
    }

    /// Remove `units` of `item` from the first active character holding it
    ///
    /// Money items come out of the purse, which never goes below zero.
    pub fn remove_item(&mut self, item: ItemIndex, units: u32) -> Result<u32> {
        if let Some(value) = inventory::money_value(item, units) {
            self.lose_gold(value);
            return Ok(units);
        }
        if let Some(holder) = self
            .active_characters_mut()
            .find(|c| c.inventory.have_item(item))
        {
            return Ok(holder.inventory.remove_units(item, units));
        }
        if self.keys.have_item(item) {
            return Ok(self.keys.remove_units(item, units));
        }
        Err(Error::invalid(format!("party does not hold {}", item)))
    }

    /// Remove exactly `units` of `item`, drawing on as many holders as needed
    pub fn remove_n_of_item(&mut self, item: ItemIndex, units: u32) -> Result<()> {
        if let Some(value) = inventory::money_value(item, units) {
            if self.gold < value {
                return Err(Error::invalid(format!("purse holds {}, needs {}", self.gold, value)));
            }
            self.lose_gold(value);
            return Ok(());
        }
        let held = self.item_count(item);
        if held < units {
            return Err(Error::invalid(format!(
                "party holds {} of {}, needs {}",
                held, item, units
            )));
        }
        let mut remaining = units;
        for character in self.active_characters_mut() {
            if remaining == 0 {
                break;
            }
            remaining -= character.inventory.remove_units(item, remaining);
        }
        if remaining > 0 {
            self.keys.remove_units(item, remaining);
        }
        Ok(())
    }

    /// Best (or worst) current value of `skill` among active characters
    pub fn get_skill(&self, skill: SkillType, best: bool) -> Option<(CharIndex, u16)> {
        let values = self
            .active_characters()
            .map(|c| (c.index, c.skills.get(skill)));
        if best {
            values.fold(None, |acc, (i, v)| match acc {
                Some((_, b)) if b >= v => acc,
                _ => Some((i, v)),
            })
        } else {
            values.fold(None, |acc, (i, v)| match acc {
                Some((_, w)) if w <= v => acc,
                _ => Some((i, v)),
            })
        }
    }
}

impl Default for Party {
    /// The full roster with Locklear, Owyn and Gorath active
    fn default() -> Self {
        Self {
            gold: Royals::default(),
            characters: Character::roster(),
            active: vec![CharIndex::LOCKLEAR, CharIndex::OWYN, CharIndex::GORATH],
            keys: Inventory::default(),
        }
    }
}
