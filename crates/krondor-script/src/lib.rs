//! Krondor Script - RON loader for quest content
//!
//! Loads authored content from RON files:
//! - Dialog snippets with their actions and gated choices
//! - Chapter start locations
//! - Monster and spell name tables
//! - Session configuration

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, ScriptDefs};
pub use schema::chapter::{ChapterDef, ChapterFile};
pub use schema::snippet::{ChoiceDef, ChoiceSpec, SnippetDef};
