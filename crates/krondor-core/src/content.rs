//! Name tables consumed by dialogs

use crate::identity::{MonsterIndex, SpellIndex};
use serde::{Deserialize, Serialize};

/// Monster and spell names, indexed by their game ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTables {
    #[serde(default)]
    pub monster_names: Vec<String>,
    #[serde(default)]
    pub spell_names: Vec<String>,
}

impl ContentTables {
    pub fn monster_name(&self, monster: MonsterIndex) -> Option<&str> {
        self.monster_names
            .get(usize::from(monster.0))
            .map(String::as_str)
    }

    pub fn spell_name(&self, spell: SpellIndex) -> Option<&str> {
        self.spell_names.get(usize::from(spell.0)).map(String::as_str)
    }
}
