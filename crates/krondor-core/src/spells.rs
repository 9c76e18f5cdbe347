//! Static spells and the spell-active bitset
//!
//! Static spells stay in effect for a while after casting. Each cast is a
//! `Spell` entry in the time expiring ledger; the bitset mirrors which of
//! them still have time left.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum StaticSpell {
    DragonsBreath = 0,
    CandleGlow = 1,
    Stardusk = 2,
    AndTheLightShallLie = 3,
    Union = 4,
    ScentOfSarig = 5,
}

impl StaticSpell {
    pub fn raw(self) -> u16 {
        self as u16
    }
}

/// One bit per static spell id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellState(pub u16);

impl SpellState {
    pub fn is_active(&self, spell: u16) -> bool {
        spell < 16 && self.0 & (1 << spell) != 0
    }

    /// Ids past the bitset are ignored
    pub fn set(&mut self, spell: u16, active: bool) {
        if spell >= 16 {
            return;
        }
        if active {
            self.0 |= 1 << spell;
        } else {
            self.0 &= !(1 << spell);
        }
    }
}
