use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Read-only summary of one game's record, as shown on the stats screen.
#[readonly::make]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameStats {
    pub level: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub win_rate: f64,
    pub current_difficulty: Difficulty,
    /// Most recent outcomes, oldest first.
    pub recent_performance: Vec<bool>,
}

impl GameStats {
    pub(crate) fn new(
        level: u32,
        games_played: u32,
        games_won: u32,
        win_rate: f64,
        current_difficulty: Difficulty,
        recent_performance: Vec<bool>,
    ) -> Self {
        Self {
            level,
            games_played,
            games_won,
            win_rate,
            current_difficulty,
            recent_performance,
        }
    }
}

/// Coins and stars granted for one finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub coins: u64,
    pub stars: u64,
}
