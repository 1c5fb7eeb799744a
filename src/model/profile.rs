use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none};

use super::timestamp::{self, IsoMicros};
use super::{GameRecord, GameType};

pub const DEFAULT_PLAYER_NAME: &str = "小朋友";

/// Version written by this build. Files without the field are version 0.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Everything persisted for the single player of an installation.
///
/// Maps are ordered so that serializing the same profile twice yields the
/// same bytes.
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub schema_version: u32,

    #[serde(default = "default_player_name")]
    pub player_name: String,

    #[serde(default = "timestamp::now")]
    #[serde_as(as = "IsoMicros")]
    pub created_at: NaiveDateTime,

    #[serde(default = "timestamp::now")]
    #[serde_as(as = "IsoMicros")]
    pub last_played: NaiveDateTime,

    /// Kept as entered (`YYYY-MM-DD`); parsed lazily so a malformed value
    /// only disables the age baseline.
    pub birth_date: Option<String>,

    #[serde(default)]
    pub total_coins: u64,

    #[serde(default)]
    pub total_stars: u64,

    #[serde(default)]
    pub daily_streak: u32,

    #[serde(default)]
    pub achievements: BTreeSet<String>,

    /// Manual overrides keyed by game id. Raw integers; clamped on use.
    #[serde(default)]
    pub difficulty_settings: BTreeMap<String, i64>,

    #[serde(default)]
    pub games: BTreeMap<String, GameRecord>,

    /// Keys this version does not know about, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_player_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        let created_at = timestamp::now();
        Profile {
            schema_version: CURRENT_SCHEMA_VERSION,
            player_name: default_player_name(),
            created_at,
            last_played: created_at,
            birth_date: None,
            total_coins: 0,
            total_stars: 0,
            daily_streak: 0,
            achievements: BTreeSet::new(),
            difficulty_settings: BTreeMap::new(),
            games: GameType::all()
                .into_iter()
                .map(|game_type| (game_type.id().to_string(), GameRecord::default()))
                .collect(),
            extra: BTreeMap::new(),
        }
    }
}

impl Profile {
    pub fn record(&self, game_type: GameType) -> Option<&GameRecord> {
        self.games.get(game_type.id())
    }

    pub fn record_mut(&mut self, game_type: GameType) -> &mut GameRecord {
        self.games.entry(game_type.id().to_string()).or_default()
    }

    /// Repairs counters a hand-edited file may have left inconsistent.
    /// Returns `true` if any record changed.
    pub fn normalize(&mut self) -> bool {
        self.games
            .values_mut()
            .fold(false, |changed, record| record.normalize() || changed)
    }

    pub fn has_all_known_games(&self) -> bool {
        GameType::all()
            .iter()
            .all(|game_type| self.games.contains_key(game_type.id()))
    }
}
