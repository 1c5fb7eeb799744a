use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty level handed to a mini-game, always within 1..=10.
///
/// Values read from disk are clamped rather than rejected, so a hand-edited
/// save file can never push a game outside its parameter table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(10);
    /// Baseline used when no birth date is known.
    pub const MEDIUM: Difficulty = Difficulty(5);

    pub fn clamped(value: i64) -> Difficulty {
        Difficulty(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Strict constructor for user input.
    pub fn new(value: i64) -> Option<Difficulty> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Some(Difficulty(value as u8))
        } else {
            None
        }
    }

    pub fn all() -> Vec<Difficulty> {
        (Self::MIN.0..=Self::MAX.0).map(Difficulty).collect()
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Moves by `delta` steps, saturating at the bounds.
    pub fn shifted(&self, delta: i64) -> Difficulty {
        Difficulty::clamped(self.0 as i64 + delta)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::MIN
    }
}

impl From<i64> for Difficulty {
    fn from(value: i64) -> Self {
        Difficulty::clamped(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
