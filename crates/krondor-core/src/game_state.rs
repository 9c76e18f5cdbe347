//! The session aggregate
//!
//! [`GameState`] owns everything dialogs read and write: the optional save
//! image, the party, the clock, the time expiring ledger and the transient
//! scalars a running dialog passes between its actions and choices. The
//! interpreter, choice evaluator, time changer and chapter controller are
//! implemented on it in their own modules.

use crate::choice::ActiveStateFlag;
use crate::config::GameConfig;
use crate::content::ContentTables;
use crate::dialog::Target;
use crate::error::{Error, Result};
use crate::identity::{CharIndex, Chapter, MonsterIndex, Royals, ZoneNumber};
use crate::ledger::{ExpiringStateType, TimeExpiringLedger};
use crate::party::{inventory, InventoryItem, Party};
use crate::rng::{GameRng, RandomSource};
use crate::save::{layout, SaveBuffer};
use crate::spells::SpellState;
use crate::state::{self, EventPointer};
use crate::text::TextVariableStore;
use crate::time::{Time, WorldClock};
use log::{debug, info};

/// Slots of the dialog character selection table
pub const DIALOG_CHARACTER_SLOTS: usize = 6;
/// Marks an empty selection slot
pub const UNSET_CHARACTER: u8 = 0xff;

/// Actor id meaning "nobody"
const NO_ACTOR: u8 = 0xc8;
/// Upper bound handed to the random source when picking a dialog character
const RANDOM_CHARACTER_LIMIT: u32 = 0x1f8;

#[derive(Debug)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) save: Option<SaveBuffer>,
    pub(crate) party: Party,
    pub(crate) chapter: Chapter,
    pub(crate) zone: ZoneNumber,
    pub(crate) clock: WorldClock,
    pub(crate) ledger: TimeExpiringLedger,
    pub(crate) spell_state: SpellState,
    pub(crate) light_intensity: u8,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) content: ContentTables,
    pub(crate) text_variables: TextVariableStore,

    pub(crate) active_character: Option<CharIndex>,
    pub(crate) dialog_character: Option<CharIndex>,
    pub(crate) dialog_characters: [u8; DIALOG_CHARACTER_SLOTS],
    pub(crate) skill_checked_character: Option<CharIndex>,
    pub(crate) skill_value: u16,
    pub(crate) context_value: u32,
    pub(crate) context_var: u32,
    pub(crate) item_value: Royals,
    pub(crate) shop_type: u32,
    pub(crate) bard_reward: Royals,
    pub(crate) end_of_dialog_state: i16,
    pub(crate) selected_item: Option<InventoryItem>,
    pub(crate) current_monster: Option<MonsterIndex>,
    pub(crate) pending_dialogs: Vec<Target>,
}

impl GameState {
    /// A session without a save image, using the default configuration
    pub fn new(party: Party) -> Self {
        Self::with_config(GameConfig::default(), party)
    }

    /// A session without a save image
    pub fn with_config(config: GameConfig, mut party: Party) -> Self {
        party.set_gold(config.default_gold);
        Self {
            save: None,
            chapter: config.default_chapter,
            zone: ZoneNumber::default(),
            clock: WorldClock::default(),
            ledger: TimeExpiringLedger::new(config.ledger_capacity),
            spell_state: SpellState::default(),
            light_intensity: 0,
            rng: Box::new(GameRng::new(config.rng_seed)),
            content: ContentTables::default(),
            text_variables: TextVariableStore::default(),
            active_character: party.first_active(),
            dialog_character: None,
            dialog_characters: [UNSET_CHARACTER; DIALOG_CHARACTER_SLOTS],
            skill_checked_character: None,
            skill_value: 0,
            context_value: 0,
            context_var: 0,
            item_value: Royals::default(),
            shop_type: 0,
            bard_reward: Royals::default(),
            end_of_dialog_state: 0,
            selected_item: None,
            current_monster: None,
            pending_dialogs: Vec::new(),
            party,
            config,
        }
    }

    /// A session backed by `save`
    pub fn with_save(config: GameConfig, party: Party, save: SaveBuffer) -> Result<Self> {
        let mut state = Self::with_config(config, party);
        state.load_game_data(save)?;
        Ok(state)
    }

    /// Replace the save image and re-derive every cached value from it
    pub fn load_game_data(&mut self, save: SaveBuffer) -> Result<()> {
        let raw_chapter = save.read_u16(layout::CHAPTER)?;
        if !(1..=9).contains(&raw_chapter) {
            return Err(Error::invalid(format!(
                "save records chapter {}",
                raw_chapter
            )));
        }
        let ledger = TimeExpiringLedger::load(&save, self.config.ledger_capacity)?;

        self.chapter = Chapter(raw_chapter as u8);
        self.zone = ZoneNumber(save.read_u8(layout::ZONE)?);
        self.clock = WorldClock::new(
            Time(save.read_u32(layout::TIME)?),
            Time(save.read_u32(layout::TIME_LAST_SLEPT)?),
        );
        self.party.set_gold(Royals(save.read_u32(layout::GOLD)?));
        self.spell_state = SpellState::default();
        for entry in ledger.entries() {
            if entry.kind == ExpiringStateType::Spell {
                self.spell_state.set(entry.data, !entry.duration.is_zero());
            }
        }
        self.ledger = ledger;
        self.save = Some(save);
        self.active_character = self.party.first_active();
        self.clear_dialog_context();

        info!(
            "loaded save: {}, {}, {}, {} timed effects",
            self.chapter,
            self.zone,
            self.clock.time(),
            self.ledger.len()
        );
        Ok(())
    }

    /// Write chapter, zone, purse, clock and ledger back into the save image
    pub fn save_state(&mut self) -> Result<()> {
        let Some(save) = self.save.as_mut() else {
            return Err(Error::invalid("no save loaded"));
        };
        save.write_u16(layout::CHAPTER, u16::from(self.chapter.raw()))?;
        save.write_u8(layout::ZONE, self.zone.raw())?;
        save.write_u32(layout::GOLD, self.party.gold().0)?;
        save.write_u32(layout::TIME, self.clock.time().raw())?;
        save.write_u32(layout::TIME_LAST_SLEPT, self.clock.time_last_slept().raw())?;
        self.ledger.store(save)
    }

    pub fn save(&self) -> Option<&SaveBuffer> {
        self.save.as_ref()
    }

    pub fn take_save(&mut self) -> Option<SaveBuffer> {
        self.save.take()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_random_source(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
    }

    /// Inclusive random number from the session's source
    pub fn get_random_number(&mut self, min: u32, max: u32) -> u32 {
        self.rng.random_number(min, max)
    }

    pub fn set_content(&mut self, content: ContentTables) {
        self.content = content;
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn party_mut(&mut self) -> &mut Party {
        &mut self.party
    }

    pub fn chapter(&self) -> Chapter {
        self.chapter
    }

    /// Set the chapter, writing it through to the save image
    pub fn set_chapter(&mut self, chapter: Chapter) -> Result<()> {
        self.chapter = chapter;
        if let Some(save) = self.save.as_mut() {
            save.write_u16(layout::CHAPTER, u16::from(chapter.raw()))?;
        }
        Ok(())
    }

    pub fn zone(&self) -> ZoneNumber {
        self.zone
    }

    pub fn set_zone(&mut self, zone: ZoneNumber) {
        self.zone = zone;
    }

    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut WorldClock {
        &mut self.clock
    }

    pub fn ledger(&self) -> &TimeExpiringLedger {
        &self.ledger
    }

    pub fn spell_state(&self) -> SpellState {
        self.spell_state
    }

    pub fn light_intensity(&self) -> u8 {
        self.light_intensity
    }

    pub fn text_variables(&self) -> &TextVariableStore {
        &self.text_variables
    }

    pub fn money(&self) -> Royals {
        self.party.gold()
    }

    pub fn context_value(&self) -> u32 {
        self.context_value
    }

    pub fn set_context_value(&mut self, value: u32) {
        self.context_value = value;
    }

    pub fn context_var(&self) -> u32 {
        self.context_var
    }

    pub fn item_value(&self) -> Royals {
        self.item_value
    }

    pub fn set_item_value(&mut self, value: Royals) {
        self.item_value = value;
    }

    pub fn skill_value(&self) -> u16 {
        self.skill_value
    }

    pub fn skill_checked_character(&self) -> Option<CharIndex> {
        self.skill_checked_character
    }

    pub fn shop_type(&self) -> u32 {
        self.shop_type
    }

    pub fn set_shop_type(&mut self, shop_type: u32) {
        self.shop_type = shop_type;
    }

    pub fn bard_reward(&self) -> Royals {
        self.bard_reward
    }

    pub fn set_bard_reward(&mut self, reward: Royals) {
        self.bard_reward = reward;
    }

    pub fn end_of_dialog_state(&self) -> i16 {
        self.end_of_dialog_state
    }

    pub fn selected_item(&self) -> Option<&InventoryItem> {
        self.selected_item.as_ref()
    }

    pub fn set_selected_item(&mut self, item: Option<InventoryItem>) {
        self.selected_item = item;
    }

    pub fn set_current_monster(&mut self, monster: Option<MonsterIndex>) {
        self.current_monster = monster;
    }

    pub fn active_character(&self) -> Option<CharIndex> {
        self.active_character
    }

    pub fn set_active_character(&mut self, character: CharIndex) -> Result<()> {
        let name = self
            .party
            .character(character)
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::invalid(format!("no character {} in party", character)))?;
        self.active_character = Some(character);
        self.text_variables.set_active_character(name);
        Ok(())
    }

    pub fn dialog_character(&self) -> Option<CharIndex> {
        self.dialog_character
    }

    pub fn set_dialog_character(&mut self, character: Option<CharIndex>) {
        self.dialog_character = character;
    }

    /// Snippets queued by `PushNextDialog`, oldest first
    pub fn take_pending_dialogs(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.pending_dialogs)
    }

    /// Reset the per-dialog scalars
    pub fn clear_dialog_context(&mut self) {
        self.dialog_character = None;
        self.dialog_characters = [UNSET_CHARACTER; DIALOG_CHARACTER_SLOTS];
        self.skill_checked_character = None;
        self.skill_value = 0;
        self.context_value = 0;
        self.end_of_dialog_state = 0;
        self.pending_dialogs.clear();
    }

    // Event store access. Without a save image reads yield zero and writes
    // are dropped.

    pub(crate) fn read_save<T: Default>(
        &self,
        read: impl FnOnce(&SaveBuffer) -> Result<T>,
    ) -> Result<T> {
        match &self.save {
            Some(save) => read(save),
            None => Ok(T::default()),
        }
    }

    pub(crate) fn write_save(
        &mut self,
        write: impl FnOnce(&mut SaveBuffer) -> Result<()>,
    ) -> Result<()> {
        match &mut self.save {
            Some(save) => write(save),
            None => Ok(()),
        }
    }

    /// Value at `ptr`; the chapter pseudo-pointer yields the current chapter
    pub fn get_event_state(&self, ptr: EventPointer) -> Result<u32> {
        if ptr == ActiveStateFlag::Chapter.raw() {
            return Ok(u32::from(self.chapter.raw()));
        }
        self.read_save(|save| state::read_event(save, ptr))
    }

    /// Low bit of [`GameState::get_event_state`], chapter alias included
    pub fn read_event_bool(&self, ptr: EventPointer) -> Result<bool> {
        if ptr == ActiveStateFlag::Chapter.raw() {
            return Ok(self.chapter.raw() & 1 == 1);
        }
        self.read_save(|save| state::read_event_bool(save, ptr))
    }

    pub fn set_event_value(&mut self, ptr: EventPointer, value: u32) -> Result<()> {
        self.write_save(|save| state::set_event_flag(save, ptr, value != 0))
    }

    pub fn set_event_dialog_action(&mut self, flag: &crate::action::SetFlag) -> Result<()> {
        self.write_save(|save| state::set_event_dialog_action(save, flag))
    }

    pub fn read_conversation_item_clicked(&self, ptr: EventPointer) -> Result<bool> {
        self.read_save(|save| state::dialog::read_conversation_item_clicked(save, ptr))
    }

    pub fn set_conversation_item_clicked(&mut self, ptr: EventPointer) -> Result<()> {
        self.write_save(|save| state::dialog::set_conversation_item_clicked(save, ptr))
    }

    pub fn check_conversation_option_inhibited(&self, ptr: EventPointer) -> Result<bool> {
        self.read_save(|save| state::dialog::check_conversation_option_inhibited(save, ptr))
    }

    pub fn get_door_state(&self, door: u16) -> Result<bool> {
        self.read_save(|save| state::world::get_door_state(save, door))
    }

    pub fn set_door_state(&mut self, door: u16, open: bool) -> Result<()> {
        self.write_save(|save| state::world::set_door_state(save, door, open))
    }

    pub fn check_lock_seen(&self, lock: u16) -> Result<bool> {
        self.read_save(|save| state::world::check_lock_seen(save, lock))
    }

    pub fn set_lock_seen(&mut self, lock: u16) -> Result<()> {
        self.write_save(|save| state::world::set_lock_seen(save, lock))
    }

    /// Temples count as seen until a save says otherwise
    pub fn read_temple_seen(&self, temple: u8) -> Result<bool> {
        match &self.save {
            Some(save) => state::world::read_temple_seen(save, temple),
            None => Ok(true),
        }
    }

    pub fn set_temple_seen(&mut self, temple: u8) -> Result<()> {
        self.write_save(|save| state::world::set_temple_seen(save, temple))
    }

    pub fn get_more_than_one_temple_seen(&self) -> Result<bool> {
        self.read_save(state::world::more_than_one_temple_seen)
    }

    // Dialog characters

    /// Map a dialog actor id to a speaker id
    ///
    /// Character speakers are reported one-based. `0xff` is the dialog
    /// character (or the first active member), `0xfe` the party leader,
    /// `0xfd` selection slot 5 and `0xf0 + n` selection slot `n`. `0xc8`
    /// means no speaker; anything else is returned unchanged.
    pub fn get_actor(&self, actor: u8) -> Result<Option<u8>> {
        let character = match actor {
            0xff => self
                .dialog_character
                .or_else(|| self.party.first_active())
                .ok_or_else(|| Error::invalid("no active character to speak"))?,
            0xfe => self.party.party_leader(self.chapter),
            0xfd => self.selected_character(5)?,
            0xf0..=0xfc => self.selected_character(actor - 0xf0)?,
            NO_ACTOR => return Ok(None),
            other => return Ok(Some(other)),
        };
        Ok(Some(character.raw() + 1))
    }

    /// Character stored in selection slot `slot`
    pub fn selected_character(&self, slot: u8) -> Result<CharIndex> {
        let raw = *self
            .dialog_characters
            .get(usize::from(slot))
            .ok_or_else(|| Error::invalid(format!("dialog character slot {} out of range", slot)))?;
        if raw == UNSET_CHARACTER {
            return Err(Error::invalid(format!("dialog character slot {} is unset", slot)));
        }
        Ok(CharIndex(raw))
    }

    pub fn dialog_characters(&self) -> &[u8; DIALOG_CHARACTER_SLOTS] {
        &self.dialog_characters
    }

    /// Fill the selection table with the usual dialog roles
    pub fn set_default_dialog_text_variables(&mut self) -> Result<()> {
        self.dialog_characters = [UNSET_CHARACTER; DIALOG_CHARACTER_SLOTS];
        self.set_dialog_text_variable(4, 0x7)?;
        self.set_dialog_text_variable(5, 0xf)?;
        self.set_dialog_text_variable(3, 0xe)?;
        self.set_dialog_text_variable(0, 0x1f)
    }

    /// Resolve a character attribute into slot `index`
    ///
    /// Attributes 1..=6 name a character directly, 7 is the party leader,
    /// 0xb..=0xd the first three active members, and 0xe, 0xf, 0x10, 0x1f
    /// pick randomly among magicians, swordsmen, Gorath or Patrus, and
    /// everyone but the leader.
    pub fn set_dialog_text_variable(&mut self, index: u8, attribute: u8) -> Result<()> {
        let character = match attribute {
            1..=6 => CharIndex(attribute - 1),
            0x7 => self.party.party_leader(self.chapter),
            0xb..=0xd => *self
                .party
                .active_indices()
                .get(usize::from(attribute - 0xb))
                .ok_or_else(|| Error::invalid(format!("no active character {}", attribute - 0xb)))?,
            0xe | 0xf | 0x10 | 0x1f => self.select_random_active_character(index, attribute)?,
            other => {
                debug!("dialog text variable {} ignores attribute {:#x}", index, other);
                return Ok(());
            }
        };
        self.set_character_text_variable(index, character)
    }

    /// Random active character for `attribute`, skipping anyone already
    /// placed in a slot before `index`
    fn select_random_active_character(&mut self, index: u8, attribute: u8) -> Result<CharIndex> {
        let leader = self.party.party_leader(self.chapter);
        let earlier = &self.dialog_characters[..usize::from(index).min(DIALOG_CHARACTER_SLOTS)];
        let candidates: Vec<CharIndex> = self
            .party
            .active_indices()
            .iter()
            .copied()
            .filter(|c| !earlier.contains(&c.raw()))
            .filter(|c| match attribute {
                0xe => c.is_spell_caster(),
                0xf => c.is_swordsman(),
                0x10 => matches!(*c, CharIndex::GORATH | CharIndex::PATRUS),
                _ => *c != leader,
            })
            .collect();
        if candidates.is_empty() {
            return Ok(leader);
        }
        let roll = self.get_random_number(0, RANDOM_CHARACTER_LIMIT) as usize;
        Ok(candidates[roll % candidates.len()])
    }

    /// Put `character` in selection slot `index` and its name in text variable `index`
    pub fn set_character_text_variable(&mut self, index: u8, character: CharIndex) -> Result<()> {
        let name = self
            .party
            .character(character)
            .map(|c| c.name.clone())
            .ok_or_else(|| Error::invalid(format!("no character {} in party", character)))?;
        if let Some(slot) = self.dialog_characters.get_mut(usize::from(index)) {
            *slot = character.raw();
        }
        self.text_variables.set_text_variable(usize::from(index), name);
        Ok(())
    }

    pub(crate) fn selected_item_name(&self) -> Result<&'static str> {
        self.selected_item
            .map(|i| inventory::item_name(i.item))
            .ok_or_else(|| Error::invalid("no item selected"))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::fresh_state;
    use super::*;

    #[test]
    fn test_chapter_pseudo_pointer() {
        let mut state = fresh_state();
        state.set_chapter(Chapter(4)).unwrap();
        assert_eq!(state.get_event_state(0x7537).unwrap(), 4);
        assert_eq!(state.save().unwrap().read_u16(layout::CHAPTER).unwrap(), 4);
        assert!(!state.read_event_bool(0x7537).unwrap());
        state.set_chapter(Chapter(5)).unwrap();
        assert!(state.read_event_bool(0x7537).unwrap());
    }

    #[test]
    fn test_random_pick_skips_earlier_slots() {
        let mut state = fresh_state();
        state
            .set_character_text_variable(0, CharIndex::OWYN)
            .unwrap();
        // magicians in the party: only Owyn, already in slot 0
        state.set_dialog_text_variable(2, 0xe).unwrap();
        assert_eq!(state.selected_character(2).unwrap(), CharIndex::LOCKLEAR);
        // a later slot does not hide a character from an earlier one
        state
            .set_character_text_variable(5, CharIndex::GORATH)
            .unwrap();
        state.set_dialog_text_variable(1, 0x10).unwrap();
        assert_eq!(state.selected_character(1).unwrap(), CharIndex::GORATH);
    }

    #[test]
    fn test_no_save_fallback() {
        let mut state = GameState::new(Party::default());
        assert_eq!(state.chapter(), Chapter(7));
        assert_eq!(state.money(), Royals(1000));
        state.set_event_value(0x1b58, 1).unwrap();
        assert!(!state.read_event_bool(0x1b58).unwrap());
        assert!(state.read_temple_seen(3).unwrap());
        assert!(state.save_state().is_err());
    }

    #[test]
    fn test_load_rederives_caches() {
        let mut save = SaveBuffer::blank();
        save.write_u16(layout::CHAPTER, 3).unwrap();
        save.write_u32(layout::GOLD, 250).unwrap();
        save.write_u32(layout::TIME, 43200 + 1800 * 9).unwrap();
        let mut ledger = TimeExpiringLedger::default();
        ledger.add_spell(2, Time(600));
        ledger.store(&mut save).unwrap();

        let mut state =
            GameState::with_save(GameConfig::default(), Party::default(), save).unwrap();
        assert_eq!(state.chapter(), Chapter(3));
        assert_eq!(state.money(), Royals(250));
        assert_eq!(state.clock().time().hour_of_day(), 9);
        assert!(state.spell_state().is_active(2));
        assert_eq!(state.ledger().entries()[0].kind, ExpiringStateType::Spell);

        state.party_mut().set_gold(Royals(7));
        state.save_state().unwrap();
        assert_eq!(state.save().unwrap().read_u32(layout::GOLD).unwrap(), 7);
    }

    #[test]
    fn test_load_rejects_bad_chapter() {
        let mut state = GameState::new(Party::default());
        assert!(matches!(
            state.load_game_data(SaveBuffer::blank()),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_actor_resolution() {
        let mut state = fresh_state();
        assert_eq!(state.get_actor(0xff).unwrap(), Some(1));
        assert_eq!(state.get_actor(0xfe).unwrap(), Some(1));
        assert_eq!(state.get_actor(0xc8).unwrap(), None);
        assert_eq!(state.get_actor(0x42).unwrap(), Some(0x42));
        assert!(matches!(
            state.get_actor(0xf2),
            Err(Error::InvalidOperation(_))
        ));
        assert!(state.get_actor(0xfd).is_err());

        state
            .set_character_text_variable(2, CharIndex::GORATH)
            .unwrap();
        assert_eq!(state.get_actor(0xf2).unwrap(), Some(2));
        assert_eq!(state.text_variables().get(2), Some("Gorath"));
    }

    #[test]
    fn test_default_dialog_characters() {
        let mut state = fresh_state();
        state.set_default_dialog_text_variables().unwrap();
        // every roll is zero, so the first candidate in party order wins
        assert_eq!(state.selected_character(4).unwrap(), CharIndex::LOCKLEAR);
        assert_eq!(state.selected_character(3).unwrap(), CharIndex::OWYN);
        // slot 4 already holds Locklear
        assert_eq!(state.selected_character(5).unwrap(), CharIndex::GORATH);
        assert_eq!(state.selected_character(0).unwrap(), CharIndex::OWYN);
        assert!(state.selected_character(1).is_err());
    }
}
