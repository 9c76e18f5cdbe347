//! Chapter transitions
//!
//! Moving to a new chapter rewinds most per-chapter state in one bulk
//! pass: the clock jumps to the next morning, timed effects run out,
//! unique encounters reset and the active party is restored to health.

use crate::dialog::{DialogStore, Target};
use crate::error::{Error, Result};
use crate::game_state::GameState;
use crate::identity::{Chapter, Royals, ZoneNumber};
use crate::state;
use crate::time::{Time, Times};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Passes of the ledger reduce run on a transition
const EXPIRY_PASSES: usize = 80;
/// Delta of each of those passes
const EXPIRY_STEP: Time = Time(0x7530);
/// Longest start-of-chapter snippet chain followed
const MAX_CHAIN: usize = 64;

/// World position in map units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// Where and when a chapter begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterStart {
    pub zone: ZoneNumber,
    #[serde(default)]
    pub position: Position,
    /// Added to the midnight the chapter starts on
    #[serde(default)]
    pub time_elapsed: Time,
    /// First snippet of the chapter's start-up chain
    #[serde(default)]
    pub snippet: Option<Target>,
}

/// Per-chapter start data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterData {
    #[serde(default)]
    pub starts: IndexMap<u8, ChapterStart>,
    /// Snippet whose actions run at the start of every chapter
    #[serde(default)]
    pub common_snippet: Option<Target>,
}

impl ChapterData {
    pub fn start(&self, chapter: Chapter) -> Result<&ChapterStart> {
        self.starts
            .get(&chapter.raw())
            .ok_or_else(|| Error::invalid(format!("no start location for {}", chapter)))
    }
}

impl GameState {
    /// Begin `chapter`, returning where the party now stands
    pub fn transition_to_chapter(
        &mut self,
        chapter: Chapter,
        data: &ChapterData,
        dialogs: &DialogStore,
    ) -> Result<ChapterStart> {
        info!("transition to {}", chapter);
        let start = *data.start(chapter)?;
        self.set_chapter(chapter)?;
        self.set_zone(start.zone);

        let next_day = self.clock.time() + Times::ONE_DAY;
        let morning = next_day - (next_day % Times::ONE_DAY) + start.time_elapsed;
        self.clock.set_time(morning);

        for _ in 0..EXPIRY_PASSES {
            self.reduce_and_evaluate_time_expiring_state(EXPIRY_STEP)?;
        }
        self.write_save(state::encounter::clear_unique_encounter_state_flags)?;

        if chapter != Chapter::FIRST {
            let gold = self.party.gold();
            self.write_save(|save| state::money::write_party_money(save, chapter, gold))?;
        }
        match chapter.raw() {
            3 => self.set_event_value(0x1fbc, 0)?,
            4 => self.party.set_gold(Royals(0)),
            5..=8 => {
                let previous = Chapter(chapter.raw() - 1);
                let gold = self.read_save(|save| state::money::read_party_money(save, previous))?;
                debug!("restoring {} stashed at {}", gold, previous);
                self.party.set_gold(gold);
                if chapter.raw() == 7 {
                    self.set_event_value(0x1ab1, 1)?;
                }
            }
            _ => {}
        }

        for character in self.party.active_characters_mut() {
            character.conditions.clear();
            character.skills.heal_fully();
        }
        let roster: Vec<_> = self.party.characters().iter().map(|c| c.index).collect();
        for index in roster {
            self.party.get_character_mut(index)?.skills.clear_unseen_improvements();
            self.write_save(|save| state::skill::clear_unseen_improvements(save, index))?;
        }

        if let Some(common) = data.common_snippet {
            let snippet = dialogs.get(common)?;
            self.evaluate_actions(&snippet.actions)?;
        }
        if let Some(first) = start.snippet {
            self.run_snippet_chain(first, dialogs)?;
        }
        Ok(start)
    }

    /// Apply a snippet's actions, then move to the last choice that holds
    ///
    /// Snippets with choices keep the chain going. The chain ends at a
    /// snippet without choices, whose actions run once, or at a snippet
    /// where no choice holds.
    pub fn run_snippet_chain(&mut self, first: Target, dialogs: &DialogStore) -> Result<()> {
        let mut current = first;
        let mut steps = 0;
        loop {
            if steps == MAX_CHAIN {
                return Err(Error::invalid(format!("snippet chain from {} does not end", first)));
            }
            steps += 1;
            debug!("running snippet {}", current);
            let snippet = dialogs.get(current)?;
            self.evaluate_actions(&snippet.actions)?;

            let mut next = None;
            for choice in &snippet.choices {
                if self.evaluate_dialog_choice(&choice.choice)? {
                    next = Some(choice.target);
                }
            }
            let next = match next {
                Some(next) => next,
                None => return Ok(()),
            };
            let following = dialogs.get(next)?;
            if following.choices.is_empty() {
                if next != current {
                    debug!("running final snippet {}", next);
                    self.evaluate_actions(&following.actions)?;
                }
                return Ok(());
            }
            current = next;
        }
    }
}
