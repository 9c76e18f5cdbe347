//! Script loader - loads RON files into content definitions

use crate::error::{Error, Result};
use crate::schema::chapter::ChapterFile;
use crate::schema::snippet::SnippetDef;
use krondor_core::{ChapterData, ContentTables, DialogStore, GameConfig, Target};
use std::path::Path;

/// Everything loaded from a script directory
#[derive(Debug, Clone, Default)]
pub struct ScriptDefs {
    pub dialogs: DialogStore,
    pub chapters: ChapterData,
    pub content: ContentTables,
    pub config: Option<GameConfig>,
}

impl ScriptDefs {
    /// Check that every choice and chapter points at a loaded snippet
    pub fn validate(&self) -> Result<()> {
        let check = |target: Target, from: String| {
            if self.dialogs.contains(target) {
                Ok(())
            } else {
                Err(Error::MissingField(format!("{} referenced by {}", target, from)))
            }
        };

        for (source, snippet) in self.dialogs.iter() {
            for choice in &snippet.choices {
                check(choice.target, source.to_string())?;
            }
        }
        for (chapter, start) in &self.chapters.starts {
            if let Some(target) = start.snippet {
                check(target, format!("chapter {}", chapter))?;
            }
        }
        if let Some(target) = self.chapters.common_snippet {
            check(target, "common chapter snippet".to_string())?;
        }
        Ok(())
    }
}

/// Loader for RON script files
pub struct Loader {
    defs: ScriptDefs,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            defs: ScriptDefs::default(),
        }
    }

    /// Load a single file, dispatching on its name or top-level key
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if filename.contains("snippet") || filename.contains("dialog") || content.contains("snippets:") {
            self.load_snippets_str(&content)
        } else if filename.contains("chapter") || content.contains("chapters:") {
            self.load_chapters_str(&content)
        } else if filename.contains("content")
            || content.contains("monster_names:")
            || content.contains("spell_names:")
        {
            self.load_content_str(&content)
        } else if filename.contains("config") {
            self.load_config_str(&content)
        } else {
            log::debug!("skipping unrecognised script file {}", path.display());
            Ok(())
        }
    }

    /// Load snippets from a RON string
    pub fn load_snippets_str(&mut self, content: &str) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct SnippetsFile {
            snippets: Vec<SnippetDef>,
        }

        let file: SnippetsFile = ron::from_str(content)?;
        for def in file.snippets {
            let (target, snippet) = def.into_snippet();
            if self.defs.dialogs.contains(target) {
                return Err(Error::DuplicateDefinition(format!("snippet {}", target)));
            }
            self.defs.dialogs.insert(target, snippet);
        }
        Ok(())
    }

    /// Load chapter starts from a RON string
    pub fn load_chapters_str(&mut self, content: &str) -> Result<()> {
        let file: ChapterFile = ron::from_str(content)?;
        let data = file.into_data()?;
        for (chapter, start) in data.starts {
            if self.defs.chapters.starts.insert(chapter, start).is_some() {
                return Err(Error::DuplicateDefinition(format!("chapter {}", chapter)));
            }
        }
        if let Some(target) = data.common_snippet {
            if self.defs.chapters.common_snippet.replace(target).is_some() {
                return Err(Error::DuplicateDefinition(
                    "common chapter snippet".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load name tables from a RON string; later tables extend earlier ones
    pub fn load_content_str(&mut self, content: &str) -> Result<()> {
        let tables: ContentTables = ron::from_str(content)?;
        self.defs.content.monster_names.extend(tables.monster_names);
        self.defs.content.spell_names.extend(tables.spell_names);
        Ok(())
    }

    /// Load session configuration from a RON string
    pub fn load_config_str(&mut self, content: &str) -> Result<()> {
        let config: GameConfig = ron::from_str(content)?;
        if self.defs.config.replace(config).is_some() {
            return Err(Error::DuplicateDefinition("config".to_string()));
        }
        Ok(())
    }

    /// Load all .ron files from a directory recursively
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {}", dir.display()),
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                self.load_directory(&path)?;
            } else if path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Validate cross references and return the loaded definitions
    pub fn finish(self) -> Result<ScriptDefs> {
        self.defs.validate()?;
        Ok(self.defs)
    }

    /// Get a reference to the definitions loaded so far
    pub fn defs(&self) -> &ScriptDefs {
        &self.defs
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
