//! Dialog snippets and their store

use crate::action::DialogAction;
use crate::choice::Choice;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a dialog snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(pub u32);

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog:{:#x}", self.0)
    }
}

/// A gated branch out of a snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogChoice {
    pub choice: Choice,
    pub target: Target,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSnippet {
    #[serde(default)]
    pub actions: Vec<DialogAction>,
    #[serde(default)]
    pub choices: Vec<DialogChoice>,
}

/// Snippets by target, in load order
#[derive(Debug, Clone, Default)]
pub struct DialogStore {
    snippets: IndexMap<Target, DialogSnippet>,
}

impl DialogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a snippet, returning the one it replaced
    pub fn insert(&mut self, target: Target, snippet: DialogSnippet) -> Option<DialogSnippet> {
        self.snippets.insert(target, snippet)
    }

    pub fn contains(&self, target: Target) -> bool {
        self.snippets.contains_key(&target)
    }

    pub fn get(&self, target: Target) -> Result<&DialogSnippet> {
        self.snippets
            .get(&target)
            .ok_or(Error::SnippetNotFound(target))
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Target, &DialogSnippet)> {
        self.snippets.iter()
    }
}
