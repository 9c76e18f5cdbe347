//! Dialog text variables
//!
//! Dialog text refers to `@0` .. `@9`; the interpreter fills those slots
//! with character names, item names and prices as dialogs run.

use serde::{Deserialize, Serialize};

pub const TEXT_VARIABLE_COUNT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextVariableStore {
    variables: [Option<String>; TEXT_VARIABLE_COUNT],
    active_character: Option<String>,
}

impl TextVariableStore {
    /// Store `text` in slot `index`; out of range slots are ignored
    pub fn set_text_variable(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.variables.get_mut(index) {
            *slot = Some(text.into());
        } else {
            log::warn!("ignoring text variable {} outside 0..{}", index, TEXT_VARIABLE_COUNT);
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.variables.get(index)?.as_deref()
    }

    pub fn set_active_character(&mut self, name: impl Into<String>) {
        self.active_character = Some(name.into());
    }

    pub fn active_character(&self) -> Option<&str> {
        self.active_character.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replace `@N` references with slot contents; unset slots are left as written
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let slot = match (c, chars.peek().and_then(|d| d.to_digit(10))) {
                ('@', Some(digit)) => self.get(digit as usize),
                _ => None,
            };
            match slot {
                Some(value) => {
                    chars.next();
                    out.push_str(value);
                }
                None => out.push(c),
            }
        }
        out
    }
}
