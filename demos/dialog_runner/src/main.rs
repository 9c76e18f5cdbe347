//! Dialog Runner
//!
//! Loads a script directory, builds a blank save at the requested chapter
//! and follows a snippet chain, printing the resulting session state.
//!
//! Usage: `dialog_runner <script-dir> <target> [chapter]`
//!
//! Set `RUST_LOG=debug` to trace every action and choice.

use krondor_core::{
    layout, Chapter, GameConfig, GameState, Party, SaveBuffer, Target,
};
use krondor_script::Loader;
use std::process::ExitCode;

fn parse_number(text: &str) -> Option<u32> {
    match text.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn run(dir: &str, target: Target, chapter: Chapter) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = Loader::new();
    loader.load_directory(dir)?;
    let defs = loader.finish()?;
    println!(
        "Loaded {} snippets, {} chapter starts",
        defs.dialogs.len(),
        defs.chapters.starts.len()
    );

    let config = defs.config.clone().unwrap_or_default();
    let mut save = SaveBuffer::blank();
    save.write_u16(layout::CHAPTER, u16::from(chapter.raw()))?;
    save.write_u8(layout::ZONE, 1)?;
    save.write_u32(layout::GOLD, config.default_gold.0)?;

    let mut state = GameState::with_save(config, Party::default(), save)?;
    state.set_content(defs.content.clone());

    println!("Running {} in {}\n", target, chapter);
    state.run_snippet_chain(target, &defs.dialogs)?;

    println!("{}, {}", state.chapter(), state.zone());
    println!("Time: {}", state.clock().time());
    println!("Purse: {}", state.money());
    println!("Timed effects: {}", state.ledger().len());
    for character in state.party().active_characters() {
        println!(
            "  {}: health {}/{}",
            character.name,
            character.skills.total_health(),
            character.skills.max_total_health()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <script-dir> <target> [chapter]", args[0]);
        return ExitCode::FAILURE;
    }
    let Some(target) = parse_number(&args[2]).map(Target) else {
        eprintln!("bad target: {}", args[2]);
        return ExitCode::FAILURE;
    };
    let chapter = match args.get(3) {
        Some(raw) => match raw.parse::<u8>() {
            Ok(n) if (1..=9).contains(&n) => Chapter(n),
            _ => {
                eprintln!("chapter must be 1..=9");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default().default_chapter,
    };

    match run(&args[1], target, chapter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
