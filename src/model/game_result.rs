use serde::{Deserialize, Serialize};

/// What a mini-game reports once it is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub completed: bool,
    pub score: i64,
    /// Game-specific breakdown, stored verbatim in the history entry.
    pub details: Option<serde_json::Value>,
}

impl GameResult {
    pub fn new(completed: bool, score: i64) -> Self {
        Self {
            completed,
            score,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A round counts as a win if it was finished or earned any points.
    pub fn is_win(&self) -> bool {
        self.completed || self.score > 0
    }
}
