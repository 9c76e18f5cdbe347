//! A party member

use super::condition::{Condition, Conditions};
use super::inventory::{Inventory, InventoryItem, ItemKind};
use super::skills::{SkillType, Skills};
use crate::identity::{CharIndex, SpellIndex};
use serde::{Deserialize, Serialize};

/// Known spells, one bit per spell index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spells(pub u64);

impl Spells {
    pub const CAPACITY: u16 = 64;

    pub fn has(&self, spell: SpellIndex) -> bool {
        spell.0 < Self::CAPACITY && self.0 & (1 << spell.0) != 0
    }

    /// Returns false when `spell` does not fit the bitset
    pub fn learn(&mut self, spell: SpellIndex) -> bool {
        if spell.0 >= Self::CAPACITY {
            return false;
        }
        self.0 |= 1 << spell.0;
        true
    }

    pub fn union(&self, other: &Spells) -> Spells {
        Spells(self.0 | other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub index: CharIndex,
    pub name: String,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub spells: Spells,
}

impl Character {
    pub fn new(index: CharIndex, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            skills: Skills::default(),
            conditions: Conditions::default(),
            inventory: Inventory::default(),
            spells: Spells::default(),
        }
    }

    /// The six story characters with default stats
    pub fn roster() -> Vec<Character> {
        ["Locklear", "Gorath", "Owyn", "Pug", "James", "Patrus"]
            .iter()
            .enumerate()
            .map(|(i, name)| Character::new(CharIndex(i as u8), *name))
            .collect()
    }

    pub fn adjust_condition(&mut self, condition: Condition, amount: i32) {
        self.conditions.adjust(condition, amount);
    }

    pub fn improve_skill(&mut self, skill: SkillType, amount: i32) {
        self.skills.improve_skill(skill, amount);
    }

    pub fn is_spell_caster(&self) -> bool {
        self.index.is_spell_caster()
    }

    pub fn is_swordsman(&self) -> bool {
        self.index.is_swordsman()
    }

    /// Whether the weapon this character fights with is missing
    pub fn has_empty_weapon_slot(&self) -> bool {
        let weapon = if self.is_spell_caster() {
            ItemKind::Staff
        } else {
            ItemKind::Sword
        };
        !self
            .inventory
            .items()
            .iter()
            .any(|i| i.equipped && i.kind() == weapon)
    }

    pub fn equipped_armor(&self) -> Option<&InventoryItem> {
        self.inventory
            .items()
            .iter()
            .find(|i| i.equipped && i.kind() == ItemKind::Armor)
    }

    pub fn is_fully_healed(&self) -> bool {
        self.skills.total_health() == self.skills.max_total_health()
    }
}
