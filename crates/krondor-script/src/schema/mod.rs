//! Schema definitions for RON scripts

pub mod chapter;
pub mod snippet;
