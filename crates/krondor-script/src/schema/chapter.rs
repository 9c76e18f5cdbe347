//! Chapter start schema

use crate::error::{Error, Result};
use indexmap::IndexMap;
use krondor_core::{Chapter, ChapterData, ChapterStart, Position, Target, Time, ZoneNumber};
use serde::{Deserialize, Serialize};

/// Where one chapter begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDef {
    pub chapter: u8,
    pub zone: u8,
    #[serde(default)]
    pub position: Position,
    /// Hours past midnight the chapter opens at
    #[serde(default)]
    pub start_hour: u32,
    #[serde(default)]
    pub snippet: Option<Target>,
}

/// A file of chapter definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterFile {
    pub chapters: Vec<ChapterDef>,
    #[serde(default)]
    pub common_snippet: Option<Target>,
}

impl ChapterFile {
    /// Check chapter numbers and build the lookup table
    pub fn into_data(self) -> Result<ChapterData> {
        let mut starts = IndexMap::new();
        for def in self.chapters {
            if !(Chapter::FIRST.raw()..=Chapter::LAST.raw()).contains(&def.chapter) {
                return Err(Error::InvalidSchema(format!(
                    "chapter {} outside 1..=9",
                    def.chapter
                )));
            }
            if def.start_hour >= 24 {
                return Err(Error::InvalidSchema(format!(
                    "chapter {} starts at hour {}",
                    def.chapter, def.start_hour
                )));
            }
            let start = ChapterStart {
                zone: ZoneNumber(def.zone),
                position: def.position,
                time_elapsed: Time::from_hours(def.start_hour),
                snippet: def.snippet,
            };
            if starts.insert(def.chapter, start).is_some() {
                return Err(Error::DuplicateDefinition(format!("chapter {}", def.chapter)));
            }
        }
        Ok(ChapterData {
            starts,
            common_snippet: self.common_snippet,
        })
    }
}
