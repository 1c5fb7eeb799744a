use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    FindDifference,
    Counting,
    SimpleMath,
    MusicTheory,
    StaffReading,
    Rhythm,
    Interval,
}

impl GameType {
    pub fn all() -> Vec<GameType> {
        vec![
            GameType::FindDifference,
            GameType::Counting,
            GameType::SimpleMath,
            GameType::MusicTheory,
            GameType::StaffReading,
            GameType::Rhythm,
            GameType::Interval,
        ]
    }

    /// Games that were split out of the combined music theory game.
    pub fn music_split() -> [GameType; 3] {
        [GameType::StaffReading, GameType::Rhythm, GameType::Interval]
    }

    /// Stable key used in the save file.
    pub fn id(&self) -> &'static str {
        match self {
            GameType::FindDifference => "find_difference",
            GameType::Counting => "counting",
            GameType::SimpleMath => "simple_math",
            GameType::MusicTheory => "music_theory",
            GameType::StaffReading => "staff_reading",
            GameType::Rhythm => "rhythm",
            GameType::Interval => "interval",
        }
    }

    pub fn from_id(id: &str) -> Option<GameType> {
        GameType::all().into_iter().find(|game_type| game_type.id() == id)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for game_type in GameType::all() {
            assert_eq!(GameType::from_id(game_type.id()), Some(game_type));
        }
        assert_eq!(GameType::from_id("drawing"), None);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&GameType::SimpleMath).unwrap();
        assert_eq!(json, "\"simple_math\"");
    }
}
