//! Krondor Core - quest state and dialog logic for a Krondor save image
//!
//! This crate holds the rules that turn dialog scripts into save-state
//! changes:
//! - A bit-addressed event store over the raw save image
//! - A fixed-capacity ledger of time-expiring effects
//! - An interpreter for dialog actions
//! - An evaluator for dialog choices
//! - Bulk chapter transitions
//!
//! Everything hangs off [`GameState`], an explicit session context passed
//! by reference. Without a loaded save the store reads as zero and drops
//! writes.
//!
//! ## Example
//!
//! ```
//! use krondor_core::{DialogAction, GameState, Party, SaveBuffer, SetFlag, GameConfig, layout};
//!
//! let mut save = SaveBuffer::blank();
//! save.write_u16(layout::CHAPTER, 1).unwrap();
//! let mut state = GameState::with_save(GameConfig::default(), Party::default(), save).unwrap();
//!
//! state
//!     .evaluate_action(&DialogAction::SetFlag(SetFlag::simple(0x1b58, 1)))
//!     .unwrap();
//! assert!(state.get_door_state(0).unwrap());
//! ```

mod action;
mod chapter;
pub mod choice;
mod config;
mod content;
mod custom_state;
mod dialog;
mod encounter;
mod error;
mod evaluator;
mod game_state;
mod identity;
mod interpreter;
pub mod ledger;
pub mod party;
mod rng;
pub mod save;
mod spells;
pub mod state;
mod text;
pub mod time;
mod time_changer;

pub use action::{DialogAction, SetFlag, SpecialActionType};
pub use chapter::{ChapterData, ChapterStart, Position};
pub use choice::{create_choice, ActiveStateFlag, Choice, Scenario};
pub use config::GameConfig;
pub use content::ContentTables;
pub use dialog::{DialogChoice, DialogSnippet, DialogStore, Target};
pub use encounter::EncounterFlags;
pub use error::{Error, Result};
pub use evaluator::UNBOUNDED;
pub use game_state::{GameState, DIALOG_CHARACTER_SLOTS, UNSET_CHARACTER};
pub use identity::{CharIndex, Chapter, ItemIndex, MonsterIndex, Royals, SpellIndex, ZoneNumber};
pub use ledger::{ExpiringStateType, TimeExpiringLedger, TimeExpiringState};
pub use party::{Character, Condition, Inventory, InventoryItem, Party, SkillType};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use save::{layout, SaveBuffer};
pub use spells::{SpellState, StaticSpell};
pub use text::TextVariableStore;
pub use time::{Time, Times, WorldClock};
pub use time_changer::{TimeChange, FULL_LIGHT};
