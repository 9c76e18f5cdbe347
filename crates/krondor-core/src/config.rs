//! Session configuration

use crate::identity::{Chapter, Royals};
use crate::ledger::LEDGER_CAPACITY;
use serde::{Deserialize, Serialize};

/// Settings used when building a [`GameState`](crate::GameState)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed of the default random source
    pub rng_seed: u64,
    /// Chapter reported while no save is loaded
    pub default_chapter: Chapter,
    /// Purse of a party built without a save
    pub default_gold: Royals,
    /// Concurrent timed effects
    pub ledger_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rng_seed: 12345,
            default_chapter: Chapter(7),
            default_gold: Royals(1000),
            ledger_capacity: LEDGER_CAPACITY,
        }
    }
}
