//! Statically known flag ranges of the simple event record
//!
//! Each domain helper owns one of these ranges. They are laid out exactly
//! as in shipped save images and never overlap.

use super::event::EventPointer;
use crate::error::{Error, Result};

/// A half-open range of event pointers owned by one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRange {
    pub name: &'static str,
    pub base: EventPointer,
    pub count: u16,
}

impl FlagRange {
    pub const fn new(name: &'static str, base: EventPointer, count: u16) -> Self {
        Self { name, base, count }
    }

    /// One past the last pointer of the range
    pub fn end(&self) -> u32 {
        u32::from(self.base) + u32::from(self.count)
    }

    pub fn contains(&self, ptr: EventPointer) -> bool {
        u32::from(ptr) >= u32::from(self.base) && u32::from(ptr) < self.end()
    }

    /// Pointer of entry `index`
    pub fn pointer(&self, index: u32) -> Result<EventPointer> {
        if index >= u32::from(self.count) {
            return Err(Error::invalid(format!(
                "{} index {} outside 0..{}",
                self.name, index, self.count
            )));
        }
        Ok(self.base + index as u16)
    }

    /// Every pointer of the range
    pub fn pointers(&self) -> impl Iterator<Item = EventPointer> {
        let base = self.base;
        (0..self.count).map(move |i| base + i)
    }
}

/// Skill flags per character
pub const SKILLS_PER_CHARACTER: u16 = 0x11;

pub const UNIQUE_ENCOUNTER: FlagRange = FlagRange::new("unique encounter", 0x190, 0x12c0);
pub const RECENTLY_ENCOUNTERED: FlagRange = FlagRange::new("recent encounter", 0x1450, 10);
pub const COMBAT_SCOUTED: FlagRange = FlagRange::new("combat scouted", 0x145a, 10);
pub const COMBAT_ENCOUNTER: FlagRange = FlagRange::new("combat encounter", 0x1464, 0x3e8);
pub const SKILL_SELECTED: FlagRange =
    FlagRange::new("skill selected", 0x1856, 6 * SKILLS_PER_CHARACTER);
pub const SKILL_IMPROVEMENT: FlagRange =
    FlagRange::new("skill improvement", 0x18ce, 6 * SKILLS_PER_CHARACTER);
pub const ITEM_USED: FlagRange = FlagRange::new("item used", 0x194c, 4);
pub const TEMPLE_SEEN: FlagRange = FlagRange::new("temple seen", 0x1950, 13);
pub const CONVERSATION_INHIBITED: FlagRange =
    FlagRange::new("conversation inhibited", 0x1a2c, 0xac);
pub const DOOR: FlagRange = FlagRange::new("door", 0x1b58, 0x104);
pub const LOCK_SEEN: FlagRange = FlagRange::new("lock seen", 0x1c5c, 0x3c);
pub const CONVERSATION_DISCUSSED: FlagRange =
    FlagRange::new("conversation discussed", 0x1d4c, 0xac);

/// Every domain range, in address order
pub const ALL_RANGES: [FlagRange; 12] = [
    UNIQUE_ENCOUNTER,
    RECENTLY_ENCOUNTERED,
    COMBAT_SCOUTED,
    COMBAT_ENCOUNTER,
    SKILL_SELECTED,
    SKILL_IMPROVEMENT,
    ITEM_USED,
    TEMPLE_SEEN,
    CONVERSATION_INHIBITED,
    DOOR,
    LOCK_SEEN,
    CONVERSATION_DISCUSSED,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::event::COMPLEX_EVENT_THRESHOLD;

    #[test]
    fn test_ranges_do_not_overlap() {
        for (i, a) in ALL_RANGES.iter().enumerate() {
            for b in &ALL_RANGES[i + 1..] {
                let disjoint = a.end() <= u32::from(b.base) || b.end() <= u32::from(a.base);
                assert!(disjoint, "{} overlaps {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_ranges_sorted_and_simple() {
        for pair in ALL_RANGES.windows(2) {
            assert!(pair[0].base < pair[1].base);
        }
        for range in ALL_RANGES {
            assert!(range.end() <= u32::from(COMPLEX_EVENT_THRESHOLD));
        }
    }

    #[test]
    fn test_pointer_bounds() {
        assert_eq!(DOOR.pointer(0).unwrap(), 0x1b58);
        assert_eq!(DOOR.pointer(0x103).unwrap(), 0x1c5b);
        assert!(DOOR.pointer(0x104).is_err());
        assert!(LOCK_SEEN.contains(0x1c5c));
        assert!(!DOOR.contains(0x1c5c));
        assert_eq!(COMBAT_SCOUTED.pointers().count(), 10);
    }
}
