use chrono::NaiveDate;
use log::{info, warn};

use super::difficulty_policy::{adjust_after_game, months_between, parse_birth_date, Adjustment};
use super::migrations::migrate;
use super::profile_store::ProfileStore;
use super::settings::{format_birth_date, validate_birth_date, validate_difficulty_override};
use crate::config::{AdaptiveSettings, ADAPTIVE_SETTINGS, RECENT_PERFORMANCE_WINDOW};
use crate::error::{SettingsError, StoreError};
use crate::model::{timestamp, Difficulty, GameStats, GameType, HistoryEntry, Profile};

/// Owns the loaded profile and writes it back after every change.
#[derive(Debug)]
pub struct ProgressTracker {
    store: ProfileStore,
    profile: Profile,
    adaptive: AdaptiveSettings,
}

impl ProgressTracker {
    /// Loads (or creates) the profile and migrates it, saving if the
    /// migration changed anything.
    pub fn open(store: ProfileStore) -> Result<Self, StoreError> {
        let mut profile = store.load();
        if migrate(&mut profile) {
            store.save(&mut profile)?;
        }
        Ok(Self {
            store,
            profile,
            adaptive: ADAPTIVE_SETTINGS,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.store.save(&mut self.profile)
    }

    /// Records a finished game, runs the post-game difficulty rule and saves.
    ///
    /// The history entry carries the difficulty the game was played at,
    /// before any adjustment. Empty details are not stored.
    pub fn record_game_result(
        &mut self,
        game_type: GameType,
        won: bool,
        score: i64,
        time_taken: f64,
        details: Option<serde_json::Value>,
    ) -> Result<Adjustment, StoreError> {
        if self.profile.record(game_type).is_none() {
            warn!(target: "profile", "No record for {}; creating one", game_type);
        }
        let record = self.profile.record_mut(game_type);
        record.games_played += 1;
        if won {
            record.games_won += 1;
        }
        let entry = HistoryEntry {
            timestamp: timestamp::now(),
            won,
            score,
            time_taken,
            difficulty: record.current_difficulty,
            details: details.filter(|value| !is_empty_details(value)),
        };
        record.push_history(entry);

        let adjustment = adjust_after_game(record, &self.adaptive);
        self.save()?;
        Ok(adjustment)
    }

    pub fn game_stats(&self, game_type: GameType) -> GameStats {
        let record = self.profile.record(game_type).cloned().unwrap_or_default();
        GameStats::new(
            record.level,
            record.games_played,
            record.games_won,
            record.win_rate(),
            record.current_difficulty,
            record.recent_performance(RECENT_PERFORMANCE_WINDOW),
        )
    }

    pub fn current_difficulty(&self, game_type: GameType) -> Difficulty {
        self.profile
            .record(game_type)
            .map(|record| record.current_difficulty)
            .unwrap_or_default()
    }

    pub fn add_coins(&mut self, amount: u64) -> Result<(), StoreError> {
        self.profile.total_coins += amount;
        self.save()
    }

    pub fn add_stars(&mut self, amount: u64) -> Result<(), StoreError> {
        self.profile.total_stars += amount;
        self.save()
    }

    /// Returns `true` if the achievement was not unlocked before.
    pub fn unlock_achievement(&mut self, achievement_id: &str) -> Result<bool, StoreError> {
        if self.profile.achievements.contains(achievement_id) {
            return Ok(false);
        }
        info!(target: "profile", "Achievement unlocked: {}", achievement_id);
        self.profile.achievements.insert(achievement_id.to_string());
        self.save()?;
        Ok(true)
    }

    pub fn player_name(&self) -> &str {
        &self.profile.player_name
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.profile.player_name = name.to_string();
        self.save()
    }

    /// Validates and stores a birth date. Nothing is saved on rejection.
    pub fn set_birth_date(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        today: NaiveDate,
    ) -> Result<(), SettingsError> {
        let birth = validate_birth_date(year, month, day, today)?;
        self.profile.birth_date = Some(format_birth_date(birth));
        self.save()?;
        Ok(())
    }

    pub fn clear_birth_date(&mut self) -> Result<(), StoreError> {
        self.profile.birth_date = None;
        self.save()
    }

    /// Age in calendar months, if a readable birth date is stored.
    pub fn age_in_months(&self, today: NaiveDate) -> Option<i32> {
        self.profile
            .birth_date
            .as_deref()
            .and_then(parse_birth_date)
            .map(|birth| months_between(birth, today))
    }

    pub fn set_difficulty_override(
        &mut self,
        game_type: GameType,
        value: i64,
    ) -> Result<(), SettingsError> {
        let difficulty = validate_difficulty_override(value)?;
        self.profile
            .difficulty_settings
            .insert(game_type.id().to_string(), difficulty.value() as i64);
        self.save()?;
        Ok(())
    }

    /// Same as [`Self::set_difficulty_override`] for a game id typed in by hand.
    pub fn set_difficulty_override_by_id(
        &mut self,
        game_id: &str,
        value: i64,
    ) -> Result<(), SettingsError> {
        let game_type = GameType::from_id(game_id)
            .ok_or_else(|| SettingsError::UnknownGameType(game_id.to_string()))?;
        self.set_difficulty_override(game_type, value)
    }

    pub fn clear_difficulty_override(&mut self, game_type: GameType) -> Result<(), StoreError> {
        if self.profile.difficulty_settings.remove(game_type.id()).is_some() {
            self.save()?;
        }
        Ok(())
    }

    pub fn difficulty_override(&self, game_type: GameType) -> Option<Difficulty> {
        self.profile
            .difficulty_settings
            .get(game_type.id())
            .map(|value| Difficulty::clamped(*value))
    }

    #[cfg(test)]
    pub(crate) fn record_mut_for_test(&mut self, game_type: GameType) -> &mut crate::model::GameRecord {
        self.profile.record_mut(game_type)
    }
}

fn is_empty_details(details: &serde_json::Value) -> bool {
    match details {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{GameRecord, HISTORY_CAP};
    use crate::tests::UsingLogger;
    use std::fs;
    use test_context::test_context;

    pub(crate) fn open_temp() -> (tempfile::TempDir, ProgressTracker) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("progress.json"));
        let tracker = ProgressTracker::open(store).unwrap();
        (dir, tracker)
    }

    fn reopen(tracker: &ProgressTracker) -> ProgressTracker {
        ProgressTracker::open(tracker.store.clone()).unwrap()
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_record_counts_and_history(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        tracker
            .record_game_result(GameType::Counting, true, 90, 30.5, None)
            .unwrap();
        tracker
            .record_game_result(
                GameType::Counting,
                false,
                0,
                12.0,
                Some(serde_json::json!({"total": 10})),
            )
            .unwrap();

        let record = tracker.profile().record(GameType::Counting).unwrap();
        assert_eq!(record.games_played, 2);
        assert_eq!(record.games_won, 1);
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.history[1].details, Some(serde_json::json!({"total": 10})));

        let reloaded = reopen(&tracker);
        assert_eq!(
            reloaded.profile().record(GameType::Counting),
            Some(record)
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_empty_details_not_stored(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        tracker
            .record_game_result(GameType::Counting, true, 90, 3.0, Some(serde_json::json!({})))
            .unwrap();
        tracker
            .record_game_result(GameType::Counting, true, 90, 3.0, Some(serde_json::Value::Null))
            .unwrap();
        let record = tracker.profile().record(GameType::Counting).unwrap();
        assert!(record.history.iter().all(|entry| entry.details.is_none()));

        let contents = fs::read_to_string(tracker.store.path()).unwrap();
        assert!(!contents.contains("details"));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_open_caps_inconsistent_win_counts(_: &mut UsingLogger) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(
            &path,
            r#"{"games": {"counting": {"games_played": 2, "games_won": 5}}}"#,
        )
        .unwrap();
        let tracker = ProgressTracker::open(ProfileStore::new(&path)).unwrap();
        let stats = tracker.game_stats(GameType::Counting);
        assert_eq!(stats.games_won, 2);
        assert_eq!(stats.win_rate, 1.0);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_history_keeps_last_fifty(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        for score in 0..55 {
            tracker
                .record_game_result(GameType::SimpleMath, score % 2 == 0, score, 1.0, None)
                .unwrap();
        }
        let record = tracker.profile().record(GameType::SimpleMath).unwrap();
        assert_eq!(record.history.len(), HISTORY_CAP);
        let scores: Vec<i64> = record.history.iter().map(|e| e.score).collect();
        assert_eq!(scores, (5..55).collect::<Vec<_>>());
        assert_eq!(record.games_played, 55);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_history_entry_uses_difficulty_before_adjustment(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        for _ in 0..5 {
            tracker
                .record_game_result(GameType::Rhythm, true, 100, 5.0, None)
                .unwrap();
        }
        let record = tracker.profile().record(GameType::Rhythm).unwrap();
        assert_eq!(record.current_difficulty.value(), 2);
        assert!(record.history.iter().all(|e| e.difficulty.value() == 1));

        let adjustment = tracker
            .record_game_result(GameType::Rhythm, true, 100, 5.0, None)
            .unwrap();
        assert_eq!(adjustment, Adjustment::Raised(Difficulty::clamped(3)));
        let record = tracker.profile().record(GameType::Rhythm).unwrap();
        assert_eq!(record.history.back().unwrap().difficulty.value(), 2);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_stats(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        let empty = tracker.game_stats(GameType::Interval);
        assert_eq!(empty.win_rate, 0.0);
        assert!(empty.recent_performance.is_empty());

        for i in 0..12 {
            tracker
                .record_game_result(GameType::Interval, i < 3, 10, 1.0, None)
                .unwrap();
        }
        let stats = tracker.game_stats(GameType::Interval);
        assert_eq!(stats.games_played, 12);
        assert_eq!(stats.games_won, 3);
        assert_eq!(stats.win_rate, 0.25);
        assert_eq!(stats.recent_performance.len(), 10);
        assert_eq!(stats.recent_performance[0], true);
        assert!(stats.recent_performance[1..].iter().all(|won| !won));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_coins_stars_and_achievements_persist(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        tracker.add_coins(15).unwrap();
        tracker.add_stars(3).unwrap();
        assert!(tracker.unlock_achievement("first_win").unwrap());
        assert!(!tracker.unlock_achievement("first_win").unwrap());

        let reloaded = reopen(&tracker);
        assert_eq!(reloaded.profile().total_coins, 15);
        assert_eq!(reloaded.profile().total_stars, 3);
        assert_eq!(reloaded.profile().achievements.len(), 1);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_player_name(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        assert_eq!(tracker.player_name(), crate::model::DEFAULT_PLAYER_NAME);
        tracker.set_player_name("Léa").unwrap();
        assert_eq!(reopen(&tracker).player_name(), "Léa");
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_birth_date_validation_prevents_save(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        assert!(tracker.set_birth_date(2023, 1, 1, today).is_err());
        assert_eq!(reopen(&tracker).profile().birth_date, None);

        tracker.set_birth_date(2019, 3, 7, today).unwrap();
        assert_eq!(
            reopen(&tracker).profile().birth_date.as_deref(),
            Some("2019-03-07")
        );
        assert_eq!(tracker.age_in_months(today), Some(63));

        tracker.clear_birth_date().unwrap();
        assert_eq!(tracker.age_in_months(today), None);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_difficulty_overrides(_: &mut UsingLogger) {
        let (_dir, mut tracker) = open_temp();
        assert!(matches!(
            tracker.set_difficulty_override(GameType::Counting, 12),
            Err(SettingsError::DifficultyOutOfRange(12))
        ));
        assert!(matches!(
            tracker.set_difficulty_override_by_id("drawing", 3),
            Err(SettingsError::UnknownGameType(_))
        ));

        tracker.set_difficulty_override_by_id("counting", 7).unwrap();
        assert_eq!(
            reopen(&tracker).difficulty_override(GameType::Counting),
            Some(Difficulty::clamped(7))
        );

        tracker.clear_difficulty_override(GameType::Counting).unwrap();
        assert_eq!(reopen(&tracker).difficulty_override(GameType::Counting), None);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_open_migrates_legacy_file(_: &mut UsingLogger) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let legacy = r#"{
  "player_name": "小朋友",
  "created_at": "2024-01-02T08:00:00.000001",
  "total_coins": 40,
  "total_stars": 6,
  "games": {
    "counting": {"level": 1, "games_played": 4, "games_won": 3, "current_difficulty": 2, "history": []},
    "music_theory": {"level": 1, "games_played": 10, "games_won": 7, "current_difficulty": 3, "history": []}
  },
  "achievements": [],
  "daily_streak": 0,
  "last_played": "2024-01-02T08:30:00"
}"#;
        fs::write(&path, legacy).unwrap();

        let tracker = ProgressTracker::open(ProfileStore::new(&path)).unwrap();
        let profile = tracker.profile();
        assert!(profile.has_all_known_games());
        assert_eq!(profile.total_coins, 40);
        let staff = profile.record(GameType::StaffReading).unwrap();
        assert_eq!((staff.games_played, staff.games_won), (3, 2));
        assert_eq!(
            profile.record(GameType::FindDifference),
            Some(&GameRecord::default())
        );

        // The migrated profile was written back.
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"schema_version\": 2"));
        assert!(on_disk.contains("\"staff_reading\""));
    }
}
