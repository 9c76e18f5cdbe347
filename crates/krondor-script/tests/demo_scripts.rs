//! Loads the dialog runner's sample scripts and plays them through

use krondor_core::{layout, Chapter, GameState, Party, SaveBuffer, Target, Times};
use krondor_script::Loader;
use std::path::PathBuf;

fn scripts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/dialog_runner/scripts")
}

fn session(chapter: u16) -> (GameState, krondor_script::ScriptDefs) {
    let mut loader = Loader::new();
    loader.load_directory(scripts_dir()).unwrap();
    let defs = loader.finish().unwrap();

    let mut save = SaveBuffer::blank();
    save.write_u16(layout::CHAPTER, chapter).unwrap();
    save.write_u8(layout::ZONE, 1).unwrap();
    let config = defs.config.clone().unwrap_or_default();
    let mut state = GameState::with_save(config, Party::default(), save).unwrap();
    state.set_content(defs.content.clone());
    (state, defs)
}

#[test]
fn test_demo_scripts_load() {
    let (_, defs) = session(1);
    assert_eq!(defs.dialogs.len(), 8);
    assert_eq!(defs.chapters.starts.len(), 3);
    assert_eq!(defs.content.monster_names.len(), 4);
    assert_eq!(defs.config.map(|c| c.rng_seed), Some(12345));
}

#[test]
fn test_locked_door_opens_after_picking() {
    let (mut state, defs) = session(1);
    state.run_snippet_chain(Target(0x200), &defs.dialogs).unwrap();
    assert_eq!(state.get_event_state(0x1b58).unwrap(), 1);
}

#[test]
fn test_inn_at_night_passes_time() {
    let (mut state, defs) = session(1);
    let before = state.clock().time();
    state.run_snippet_chain(Target(0x100), &defs.dialogs).unwrap();
    // Midnight on a blank save counts as night
    assert_eq!(state.clock().time().raw(), before.raw() + Times::ONE_HOUR.raw() * 8);
}

#[test]
fn test_transition_to_second_chapter() {
    let (mut state, defs) = session(1);
    let start = state
        .transition_to_chapter(Chapter(2), &defs.chapters, &defs.dialogs)
        .unwrap();
    assert_eq!(state.chapter(), Chapter(2));
    assert_eq!(start.zone.raw(), 3);
    assert_eq!(state.get_event_state(0x1b70).unwrap(), 1);
}
