use std::time::{Duration, SystemTime};

use uuid::Uuid;

use super::GameType;

/// One in-progress play of a mini-game. Never persisted.
#[derive(Clone, Debug)]
pub struct Session {
    pub playthrough_id: Uuid,
    pub game_type: GameType,
    pub started_timestamp: SystemTime,
    pub score: i64,
    pub completed: bool,
}

impl Session {
    pub fn start(game_type: GameType, now: SystemTime) -> Self {
        Self {
            playthrough_id: Uuid::new_v4(),
            game_type,
            started_timestamp: now,
            score: 0,
            completed: false,
        }
    }

    /// Time since the session started; zero if the clock went backwards.
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        now.duration_since(self.started_timestamp)
            .unwrap_or(Duration::default())
    }
}
