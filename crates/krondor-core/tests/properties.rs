use krondor_core::party::inventory::TORCH;
use krondor_core::state::{read_event, read_event_bool, set_event_dialog_action, set_event_flag};
use krondor_core::{
    layout, ActiveStateFlag, CharIndex, Chapter, ChapterData, ChapterStart, Condition,
    DialogAction, DialogStore, ExpiringStateType, GameConfig, GameRng, GameState, InventoryItem,
    Party, RandomSource, SaveBuffer, SetFlag, Time, TimeExpiringLedger, ZoneNumber, UNBOUNDED,
};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn fresh_state() -> GameState {
    let mut save = SaveBuffer::blank();
    save.write_u16(layout::CHAPTER, 1).unwrap();
    save.write_u8(layout::ZONE, 1).unwrap();
    GameState::with_save(GameConfig::default(), Party::default(), save).unwrap()
}

/// Counts how often the game asks for a number
#[derive(Debug)]
struct CountingRng {
    inner: GameRng,
    draws: Rc<Cell<usize>>,
}

impl RandomSource for CountingRng {
    fn random_number(&mut self, min: u32, max: u32) -> u32 {
        self.draws.set(self.draws.get() + 1);
        self.inner.random_number(min, max)
    }
}

fn counting_state(seed: u64) -> (GameState, Rc<Cell<usize>>) {
    let draws = Rc::new(Cell::new(0));
    let mut state = fresh_state();
    state.set_random_source(Box::new(CountingRng {
        inner: GameRng::new(seed),
        draws: Rc::clone(&draws),
    }));
    (state, draws)
}

/// Roll a condition gain for Locklear alone, starting from zero
fn roll_condition(state: &mut GameState, min: i16, max: i16) -> u8 {
    state
        .party_mut()
        .get_character_mut(CharIndex::LOCKLEAR)
        .unwrap()
        .conditions
        .clear();
    state
        .party_mut()
        .set_active_characters(vec![CharIndex::LOCKLEAR])
        .unwrap();
    state
        .evaluate_action(&DialogAction::GainCondition {
            who: 0,
            condition: Condition::Drunk,
            min,
            max,
        })
        .unwrap();
    state
        .party()
        .character(CharIndex::LOCKLEAR)
        .unwrap()
        .conditions
        .get(Condition::Drunk)
}

#[test]
fn property_roll_range_over_ten_thousand_samples() {
    let (mut state, _) = counting_state(99);
    for sample in 0..10_000u32 {
        let min = (sample % 40) as i16;
        let max = min + 1 + (sample % 53) as i16;
        let amount = i16::from(roll_condition(&mut state, min, max));
        assert!(
            (min..max).contains(&amount),
            "sample {}: {} outside [{}, {})",
            sample,
            amount,
            min,
            max
        );
    }
}

#[test]
fn property_equal_bounds_never_roll() {
    let (mut state, draws) = counting_state(7);
    for value in [0i16, 1, 37, 100] {
        assert_eq!(i16::from(roll_condition(&mut state, value, value)), value);
    }
    assert_eq!(draws.get(), 0);
}

#[test]
fn scenario_door_flag() {
    let mut state = fresh_state();
    state
        .evaluate_action(&DialogAction::SetFlag(SetFlag::simple(0x1b58, 1)))
        .unwrap();
    assert!(state.read_event_bool(0x1b58).unwrap());
    assert!(!state.read_event_bool(0x1b59).unwrap());
}

#[test]
fn scenario_light_burns_out_once() {
    let mut state = fresh_state();
    state
        .party_mut()
        .get_character_mut(CharIndex::LOCKLEAR)
        .unwrap()
        .inventory
        .add_item(InventoryItem::new(TORCH, 5).equipped());
    state.add_light_time_expiring_state(0, Time(30)).unwrap();

    state.reduce_and_evaluate_time_expiring_state(Time(30)).unwrap();
    assert!(!state
        .ledger()
        .entries()
        .iter()
        .any(|e| e.kind == ExpiringStateType::Light));
    let charges = |state: &GameState| {
        state
            .party()
            .character(CharIndex::LOCKLEAR)
            .unwrap()
            .inventory
            .items()
            .iter()
            .find(|i| i.item == TORCH)
            .map(|i| (i.quantity, i.equipped))
    };
    assert_eq!(charges(&state), Some((4, false)));

    state.reduce_and_evaluate_time_expiring_state(Time(30)).unwrap();
    assert_eq!(charges(&state), Some((4, false)));
}

#[test]
fn scenario_chapter_two_heals_party() {
    let mut state = fresh_state();
    for character in state.party_mut().active_characters_mut() {
        character.adjust_condition(Condition::Plagued, 50);
        character.skills.adjust_total_health(-35);
    }
    let mut data = ChapterData::default();
    data.starts.insert(
        2,
        ChapterStart {
            zone: ZoneNumber(2),
            position: Default::default(),
            time_elapsed: Time::ZERO,
            snippet: None,
        },
    );
    state
        .transition_to_chapter(Chapter(2), &data, &DialogStore::new())
        .unwrap();
    for character in state.party().active_characters() {
        assert!(character.is_fully_healed());
        assert_eq!(character.conditions.get(Condition::Plagued), 0);
    }
}

fn simple_pointer() -> impl Strategy<Value = u16> {
    0u16..0xdac0
}

proptest! {
    #[test]
    fn property_simple_bits_are_isolated(p in simple_pointer(), q in simple_pointer()) {
        prop_assume!(p != q);
        let mut save = SaveBuffer::blank();
        set_event_flag(&mut save, p, true).unwrap();
        prop_assert!(read_event_bool(&save, p).unwrap());
        prop_assert!(!read_event_bool(&save, q).unwrap());

        set_event_flag(&mut save, q, true).unwrap();
        set_event_flag(&mut save, p, false).unwrap();
        prop_assert!(!read_event_bool(&save, p).unwrap());
        prop_assert!(read_event_bool(&save, q).unwrap());
    }

    #[test]
    fn property_whole_byte_update_is_idempotent(
        slot in 0u16..600,
        old in any::<u8>(),
        mask in any::<u8>(),
        data in any::<u8>(),
    ) {
        let ptr = 0xdac0 + slot * 10;
        let mut save = SaveBuffer::blank();
        let mut seed = SetFlag::simple(ptr, 0);
        seed.event_data = old;
        set_event_dialog_action(&mut save, &seed).unwrap();
        prop_assert_eq!(read_event(&save, ptr).unwrap(), u32::from(old));

        let flag = SetFlag {
            event_pointer: ptr,
            event_mask: mask,
            event_data: data,
            always_zero: 0,
            event_value: 0,
        };
        set_event_dialog_action(&mut save, &flag).unwrap();
        let once = read_event(&save, ptr).unwrap();
        set_event_dialog_action(&mut save, &flag).unwrap();
        prop_assert_eq!(read_event(&save, ptr).unwrap(), once);
        prop_assert_eq!(once, u32::from((old & mask) | data));
    }

    #[test]
    fn property_ledger_decay_is_additive(
        durations in proptest::collection::vec(0u32..100_000, 1..20),
        a in 0u32..60_000,
        b in 0u32..60_000,
    ) {
        let mut split = TimeExpiringLedger::default();
        for (i, d) in durations.iter().enumerate() {
            split.add(ExpiringStateType::SetState, i as u16, 0, Time(*d));
        }
        let mut joined = split.clone();
        for i in 0..split.len() {
            split.decay(i, Time(a));
            split.decay(i, Time(b));
            joined.decay(i, Time(a + b));
        }
        prop_assert_eq!(split.entries(), joined.entries());
    }

    #[test]
    fn property_game_state_sentinel(value in 0u32..0x1_0000, min in any::<u16>(), max in 0u16..0xffff) {
        let mut state = fresh_state();
        state.set_context_value(value);
        prop_assert_eq!(
            state.evaluate_game_state_choice(ActiveStateFlag::Context, min, UNBOUNDED),
            u32::from(min) <= value
        );
        prop_assert_eq!(
            state.evaluate_game_state_choice(ActiveStateFlag::Context, min, max),
            u32::from(min) <= value && value <= u32::from(max)
        );
    }
}
