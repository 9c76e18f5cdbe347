//! Per-chapter purse stash

use crate::error::{Error, Result};
use crate::identity::{Chapter, Royals};
use crate::save::{layout, SaveBuffer};

fn stash_offset(chapter: Chapter) -> Result<usize> {
    if !(Chapter::FIRST..=Chapter::LAST).contains(&chapter) {
        return Err(Error::invalid(format!("no money stash for {}", chapter)));
    }
    Ok(layout::PARTY_MONEY_STASH + usize::from(chapter.raw() - 1) * 4)
}

pub fn read_party_money(save: &SaveBuffer, chapter: Chapter) -> Result<Royals> {
    Ok(Royals(save.read_u32(stash_offset(chapter)?)?))
}

pub fn write_party_money(save: &mut SaveBuffer, chapter: Chapter, money: Royals) -> Result<()> {
    save.write_u32(stash_offset(chapter)?, money.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stash_slots_are_separate() {
        let mut save = SaveBuffer::blank();
        write_party_money(&mut save, Chapter(4), Royals(300)).unwrap();
        write_party_money(&mut save, Chapter(5), Royals(12)).unwrap();
        assert_eq!(read_party_money(&save, Chapter(4)).unwrap(), Royals(300));
        assert_eq!(read_party_money(&save, Chapter(5)).unwrap(), Royals(12));
        assert_eq!(read_party_money(&save, Chapter(9)).unwrap(), Royals(0));
    }

    #[test]
    fn test_stash_stays_clear_of_neighbours() {
        let last = stash_offset(Chapter::LAST).unwrap() + 4;
        assert!(last <= layout::GAME_EVENT_RECORD);
        let ledger_end = layout::TIME_EXPIRING_RECORD
            + 2
            + crate::ledger::LEDGER_CAPACITY * layout::TIME_EXPIRING_ENTRY_LEN;
        assert_eq!(ledger_end, layout::PARTY_MONEY_STASH);
        assert!(stash_offset(Chapter(0)).is_err());
    }
}
