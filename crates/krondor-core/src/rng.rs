//! Deterministic random number generation
//!
//! Dialog rolls, gambling and random dialog actors all draw from a
//! [`RandomSource`]. The default source is a xorshift64 generator so a
//! seeded session replays identically on every platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of random numbers for game logic
///
/// `random_number(min, max)` is inclusive on both ends. Implementations
/// may be swapped on a [`GameState`](crate::GameState) without changing
/// any interpreter behaviour.
pub trait RandomSource: fmt::Debug {
    fn random_number(&mut self, min: u32, max: u32) -> u32;
}

/// A deterministic random number generator
///
/// Uses xorshift64 for simplicity and reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves the zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for GameRng {
    fn random_number(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.next_u64() % span) as u32
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Replays a fixed sequence of values, cycling when exhausted
///
/// Values are clamped into the requested range. Useful for scripted
/// scenarios where a roll must land on a known number.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    next: usize,
    draws: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
            draws: 0,
        }
    }

    /// Number of values handed out so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRng {
    fn random_number(&mut self, min: u32, max: u32) -> u32 {
        self.draws += 1;
        let Some(&value) = self.values.get(self.next) else {
            return min;
        };
        self.next = (self.next + 1) % self.values.len();
        value.clamp(min, max.max(min))
    }
}
