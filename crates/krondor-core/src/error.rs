//! Error types for krondor-core

use crate::dialog::Target;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An access reached past the end of the save image.
    #[error("Corrupt state: {width} byte(s) at offset {offset:#x} outside save image of {len:#x} bytes")]
    CorruptState {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Dialog snippet not found: {0}")]
    SnippetNotFound(Target),
}

impl Error {
    /// Corruption aborts a dialog script; everything else may be logged and skipped.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptState { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidOperation(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
