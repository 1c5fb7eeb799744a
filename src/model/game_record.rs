use std::collections::VecDeque;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none};

use super::timestamp::IsoMicros;
use super::Difficulty;

/// Number of results kept per game; older entries are evicted first.
pub const HISTORY_CAP: usize = 50;

/// One finished game. Never modified after it is appended.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde_as(as = "IsoMicros")]
    pub timestamp: NaiveDateTime,
    pub won: bool,
    pub score: i64,
    /// Seconds between session start and end.
    pub time_taken: f64,
    /// Difficulty the game was played at.
    pub difficulty: Difficulty,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub current_difficulty: Difficulty,
    #[serde(default)]
    pub history: VecDeque<HistoryEntry>,
}

fn default_level() -> u32 {
    1
}

impl Default for GameRecord {
    fn default() -> Self {
        GameRecord {
            level: default_level(),
            games_played: 0,
            games_won: 0,
            current_difficulty: Difficulty::default(),
            history: VecDeque::new(),
        }
    }
}

impl GameRecord {
    /// Appends a result, dropping the oldest entries past [`HISTORY_CAP`].
    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push_back(entry);
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Caps `games_won` at `games_played`. Returns `true` if it had to.
    pub fn normalize(&mut self) -> bool {
        if self.games_won <= self.games_played {
            return false;
        }
        self.games_won = self.games_played;
        true
    }

    /// All-time win rate; zero when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.games_won as f64 / self.games_played as f64
    }

    /// Outcomes of the last `n` games, oldest first.
    pub fn recent_performance(&self, n: usize) -> Vec<bool> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).map(|entry| entry.won).collect()
    }

    /// Share of wins among the last `window` games, or `None` if fewer than
    /// `window` games are on record.
    pub fn recent_success_rate(&self, window: usize) -> Option<f64> {
        if window == 0 || self.history.len() < window {
            return None;
        }
        let wins = self
            .recent_performance(window)
            .into_iter()
            .filter(|won| *won)
            .count();
        Some(wins as f64 / window as f64)
    }
}
