//! Per-character skill selection and unseen improvement flags

use super::event::{read_event_bool, set_event_flag};
use super::offsets::{FlagRange, SKILLS_PER_CHARACTER, SKILL_IMPROVEMENT, SKILL_SELECTED};
use crate::error::{Error, Result};
use crate::identity::CharIndex;
use crate::party::SkillType;
use crate::save::SaveBuffer;

fn skill_pointer(range: FlagRange, character: CharIndex, skill: SkillType) -> Result<u16> {
    let slot = skill
        .save_slot()
        .ok_or_else(|| Error::invalid(format!("{:?} has no {} flag", skill, range.name)))?;
    range.pointer(u32::from(character.raw()) * u32::from(SKILLS_PER_CHARACTER) + slot)
}

pub fn read_skill_selected(save: &SaveBuffer, character: CharIndex, skill: SkillType) -> Result<bool> {
    read_event_bool(save, skill_pointer(SKILL_SELECTED, character, skill)?)
}

pub fn set_skill_selected(
    save: &mut SaveBuffer,
    character: CharIndex,
    skill: SkillType,
    selected: bool,
) -> Result<()> {
    set_event_flag(save, skill_pointer(SKILL_SELECTED, character, skill)?, selected)
}

pub fn read_skill_unseen_improvement(
    save: &SaveBuffer,
    character: CharIndex,
    skill: SkillType,
) -> Result<bool> {
    read_event_bool(save, skill_pointer(SKILL_IMPROVEMENT, character, skill)?)
}

pub fn set_skill_unseen_improvement(
    save: &mut SaveBuffer,
    character: CharIndex,
    skill: SkillType,
    unseen: bool,
) -> Result<()> {
    set_event_flag(save, skill_pointer(SKILL_IMPROVEMENT, character, skill)?, unseen)
}

/// Clear every unseen improvement flag of `character`, including unused slots
pub fn clear_unseen_improvements(save: &mut SaveBuffer, character: CharIndex) -> Result<()> {
    let first = u32::from(character.raw()) * u32::from(SKILLS_PER_CHARACTER);
    for slot in 0..u32::from(SKILLS_PER_CHARACTER) {
        set_event_flag(save, SKILL_IMPROVEMENT.pointer(first + slot)?, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_flags_per_character() {
        let mut save = SaveBuffer::blank();
        set_skill_unseen_improvement(&mut save, CharIndex::OWYN, SkillType::Barding, true).unwrap();
        assert!(
            read_skill_unseen_improvement(&save, CharIndex::OWYN, SkillType::Barding).unwrap()
        );
        assert!(
            !read_skill_unseen_improvement(&save, CharIndex::GORATH, SkillType::Barding).unwrap()
        );
        assert!(!read_skill_selected(&save, CharIndex::OWYN, SkillType::Barding).unwrap());

        clear_unseen_improvements(&mut save, CharIndex::OWYN).unwrap();
        assert!(
            !read_skill_unseen_improvement(&save, CharIndex::OWYN, SkillType::Barding).unwrap()
        );
    }

    #[test]
    fn test_virtual_skill_has_no_flag() {
        let mut save = SaveBuffer::blank();
        assert!(set_skill_selected(&mut save, CharIndex::PUG, SkillType::TotalHealth, true).is_err());
        assert!(set_skill_selected(&mut save, CharIndex(6), SkillType::Speed, true).is_err());
    }
}
