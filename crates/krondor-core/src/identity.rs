//! Identity and quantity newtypes shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a character in the party roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharIndex(pub u8);

impl CharIndex {
    pub const LOCKLEAR: CharIndex = CharIndex(0);
    pub const GORATH: CharIndex = CharIndex(1);
    pub const OWYN: CharIndex = CharIndex(2);
    pub const PUG: CharIndex = CharIndex(3);
    pub const JAMES: CharIndex = CharIndex(4);
    pub const PATRUS: CharIndex = CharIndex(5);

    /// Number of characters in the roster
    pub const COUNT: usize = 6;

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        usize::from(self.0) < Self::COUNT
    }

    pub fn is_spell_caster(&self) -> bool {
        matches!(*self, Self::OWYN | Self::PUG | Self::PATRUS)
    }

    pub fn is_swordsman(&self) -> bool {
        matches!(*self, Self::LOCKLEAR | Self::GORATH | Self::JAMES)
    }
}

impl fmt::Display for CharIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "char:{}", self.0)
    }
}

/// Story chapter, 1 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapter(pub u8);

impl Chapter {
    pub const FIRST: Chapter = Chapter(1);
    pub const LAST: Chapter = Chapter(9);

    pub fn new(chapter: u8) -> Self {
        Self(chapter)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chapter {}", self.0)
    }
}

/// World zone number, 1 through 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneNumber(pub u8);

impl ZoneNumber {
    pub fn new(zone: u8) -> Self {
        Self(zone)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl Default for ZoneNumber {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for ZoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// Money, in the smallest denomination
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Royals(pub u32);

impl Royals {
    pub const PER_SOVEREIGN: u32 = 10;

    pub fn from_sovereigns(sovereigns: u32) -> Self {
        Self(sovereigns.saturating_mul(Self::PER_SOVEREIGN))
    }

    /// Whole sovereigns, rounded down
    pub fn sovereigns(&self) -> u32 {
        self.0 / Self::PER_SOVEREIGN
    }

    pub fn saturating_add(self, rhs: Royals) -> Royals {
        Royals(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Royals) -> Royals {
        Royals(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Royals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sovereigns = self.sovereigns();
        let royals = self.0 % Self::PER_SOVEREIGN;
        match (sovereigns, royals) {
            (0, r) => write!(f, "{} royals", r),
            (s, 0) => write!(f, "{} sovereigns", s),
            (s, r) => write!(f, "{} sovereigns and {} royals", s, r),
        }
    }
}

/// Index into the item catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemIndex(pub u8);

impl fmt::Display for ItemIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Index into the spell database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellIndex(pub u16);

/// Index into the monster name table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonsterIndex(pub u16);
