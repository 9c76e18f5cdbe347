//! Character conditions, each a percentage from 0 to 100

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Sick,
    Plagued,
    Poisoned,
    Drunk,
    Healing,
    Starving,
    NearDeath,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::Sick,
        Condition::Plagued,
        Condition::Poisoned,
        Condition::Drunk,
        Condition::Healing,
        Condition::Starving,
        Condition::NearDeath,
    ];

    /// Every condition but Healing is harmful
    pub fn is_negative(&self) -> bool {
        !matches!(self, Condition::Healing)
    }
}

pub const CONDITION_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    values: [u8; 7],
}

impl Conditions {
    pub fn get(&self, condition: Condition) -> u8 {
        self.values[condition as usize]
    }

    pub fn is_active(&self, condition: Condition) -> bool {
        self.get(condition) > 0
    }

    /// Add `amount` (possibly negative), clamped to 0..=100
    pub fn adjust(&mut self, condition: Condition, amount: i32) {
        let slot = &mut self.values[condition as usize];
        *slot = (i32::from(*slot) + amount).clamp(0, i32::from(CONDITION_MAX)) as u8;
    }

    pub fn clear(&mut self) {
        self.values = [0; 7];
    }

    pub fn any_negative(&self) -> bool {
        Condition::ALL
            .iter()
            .any(|c| c.is_negative() && self.is_active(*c))
    }
}
