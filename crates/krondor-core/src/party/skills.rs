//! Character skills
//!
//! Sixteen stored skills plus two virtual ones used by dialogs:
//! `TotalHealth` (health and stamina together) and `GainHealth`
//! (a permanent raise of maximum health).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    Health,
    Stamina,
    Speed,
    Strength,
    Defense,
    Crossbow,
    Melee,
    Casting,
    Assessment,
    Armorcraft,
    Weaponcraft,
    Barding,
    Haggling,
    Lockpick,
    Scouting,
    Stealth,
    TotalHealth,
    GainHealth,
}

impl SkillType {
    /// The stored skills, in save order
    pub const STORED: [SkillType; 16] = [
        SkillType::Health,
        SkillType::Stamina,
        SkillType::Speed,
        SkillType::Strength,
        SkillType::Defense,
        SkillType::Crossbow,
        SkillType::Melee,
        SkillType::Casting,
        SkillType::Assessment,
        SkillType::Armorcraft,
        SkillType::Weaponcraft,
        SkillType::Barding,
        SkillType::Haggling,
        SkillType::Lockpick,
        SkillType::Scouting,
        SkillType::Stealth,
    ];

    /// Position in the stored skill table, `None` for virtual skills
    pub fn save_slot(&self) -> Option<u32> {
        match self {
            SkillType::TotalHealth | SkillType::GainHealth => None,
            other => Some(*other as u32),
        }
    }
}

/// Highest value a trained skill may reach
pub const SKILL_CAP: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub max: u8,
    pub true_skill: u8,
    pub current: u8,
    pub experience: u8,
    pub modifier: i8,
    pub selected: bool,
    pub unseen_improvement: bool,
}

impl Skill {
    pub fn new(max: u8, value: u8) -> Self {
        Self {
            max,
            true_skill: value,
            current: value,
            ..Self::default()
        }
    }

    fn recompute_current(&mut self) {
        let value = i32::from(self.true_skill) + i32::from(self.modifier);
        self.current = value.clamp(0, i32::from(self.max)) as u8;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    skills: [Skill; 16],
}

impl Skills {
    /// Full health and stamina, every trained skill at `trained`
    pub fn new(max_health: u8, max_stamina: u8, trained: u8) -> Self {
        let mut skills = [Skill::new(SKILL_CAP, trained.min(SKILL_CAP)); 16];
        skills[SkillType::Health as usize] = Skill::new(max_health, max_health);
        skills[SkillType::Stamina as usize] = Skill::new(max_stamina, max_stamina);
        Self { skills }
    }

    /// Stored skill record; virtual skills map onto health
    pub fn skill(&self, skill: SkillType) -> &Skill {
        &self.skills[skill.save_slot().unwrap_or(0) as usize]
    }

    pub fn skill_mut(&mut self, skill: SkillType) -> &mut Skill {
        &mut self.skills[skill.save_slot().unwrap_or(0) as usize]
    }

    /// Current value as seen by skill checks
    pub fn get(&self, skill: SkillType) -> u16 {
        match skill {
            SkillType::TotalHealth => self.total_health(),
            SkillType::GainHealth => u16::from(self.skill(SkillType::Health).max),
            other => u16::from(self.skill(other).current),
        }
    }

    pub fn total_health(&self) -> u16 {
        u16::from(self.skills[0].current) + u16::from(self.skills[1].current)
    }

    pub fn max_total_health(&self) -> u16 {
        u16::from(self.skills[0].max) + u16::from(self.skills[1].max)
    }

    /// Raise or lower a skill by `amount` points
    pub fn improve_skill(&mut self, skill: SkillType, amount: i32) {
        match skill {
            SkillType::TotalHealth => self.adjust_total_health(amount),
            SkillType::GainHealth => self.raise_maximum(SkillType::Health, amount),
            SkillType::Health | SkillType::Stamina => {
                let stat = self.skill_mut(skill);
                let value = (i32::from(stat.current) + amount).clamp(0, i32::from(stat.max));
                stat.true_skill = value as u8;
                stat.current = value as u8;
            }
            trained => {
                let stat = self.skill_mut(trained);
                let value = (i32::from(stat.true_skill) + amount).clamp(0, i32::from(stat.max));
                stat.true_skill = value as u8;
                stat.recompute_current();
                if amount > 0 {
                    stat.unseen_improvement = true;
                }
            }
        }
    }

    /// Move a skill's ceiling and its value together
    pub fn raise_maximum(&mut self, skill: SkillType, amount: i32) {
        let stat = self.skill_mut(skill);
        let max = (i32::from(stat.max) + amount).clamp(0, i32::from(u8::MAX)) as u8;
        stat.max = max;
        let value = (i32::from(stat.true_skill) + amount).clamp(0, i32::from(max));
        stat.true_skill = value as u8;
        stat.recompute_current();
    }

    /// Heal health before stamina; damage stamina before health
    pub fn adjust_total_health(&mut self, amount: i32) {
        let order = if amount >= 0 {
            [SkillType::Health, SkillType::Stamina]
        } else {
            [SkillType::Stamina, SkillType::Health]
        };
        let mut remaining = amount;
        for skill in order {
            if remaining == 0 {
                break;
            }
            let stat = self.skill_mut(skill);
            let before = i32::from(stat.current);
            let after = (before + remaining).clamp(0, i32::from(stat.max));
            stat.current = after as u8;
            stat.true_skill = after as u8;
            remaining -= after - before;
        }
    }

    pub fn heal_fully(&mut self) {
        for skill in [SkillType::Health, SkillType::Stamina] {
            let stat = self.skill_mut(skill);
            stat.true_skill = stat.max;
            stat.current = stat.max;
        }
    }

    pub fn clear_unseen_improvements(&mut self) {
        for skill in &mut self.skills {
            skill.unseen_improvement = false;
        }
    }

    pub fn has_unseen_improvements(&self) -> bool {
        self.skills.iter().any(|s| s.unseen_improvement)
    }
}

impl Default for Skills {
    fn default() -> Self {
        Self::new(40, 40, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_health_heals_health_first() {
        let mut skills = Skills::new(40, 30, 20);
        skills.adjust_total_health(-50);
        assert_eq!(skills.get(SkillType::Stamina), 0);
        assert_eq!(skills.get(SkillType::Health), 20);

        skills.adjust_total_health(25);
        assert_eq!(skills.get(SkillType::Health), 40);
        assert_eq!(skills.get(SkillType::Stamina), 5);
        assert_eq!(skills.total_health(), 45);
        assert_eq!(skills.max_total_health(), 70);
    }

    #[test]
    fn test_trained_skill_marks_improvement() {
        let mut skills = Skills::default();
        skills.improve_skill(SkillType::Lockpick, 5);
        assert_eq!(skills.get(SkillType::Lockpick), 35);
        assert!(skills.skill(SkillType::Lockpick).unseen_improvement);

        skills.improve_skill(SkillType::Lockpick, 500);
        assert_eq!(skills.get(SkillType::Lockpick), u16::from(SKILL_CAP));

        skills.clear_unseen_improvements();
        assert!(!skills.has_unseen_improvements());
    }

    #[test]
    fn test_gain_health_raises_max() {
        let mut skills = Skills::new(40, 40, 30);
        skills.improve_skill(SkillType::GainHealth, 3);
        assert_eq!(skills.skill(SkillType::Health).max, 43);
        assert_eq!(skills.get(SkillType::Health), 43);
        assert_eq!(skills.max_total_health(), 83);
    }
}
