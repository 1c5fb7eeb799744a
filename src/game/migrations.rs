//! Ordered schema migrations for the progress file.
//!
//! Each step only ever adds missing game records, so running a step twice
//! leaves the profile as running it once did. Splitting the combined music
//! game floor-divides its counters between the new games; the remainder is
//! dropped and history is not carried over.

use log::info;

pub use crate::model::CURRENT_SCHEMA_VERSION;
use crate::model::{GameRecord, GameType, Profile};

pub struct Migration {
    /// Version the profile is stamped with after this step.
    pub version: u32,
    pub name: &'static str,
    pub apply: fn(&mut Profile),
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "split_music_theory",
        apply: split_music_theory,
    },
    Migration {
        version: 2,
        name: "backfill_known_games",
        apply: backfill_known_games,
    },
];

pub fn needs_migration(profile: &Profile) -> bool {
    profile.schema_version < CURRENT_SCHEMA_VERSION || !profile.has_all_known_games()
}

/// Brings `profile` up to date. Returns whether anything was touched, in
/// which case the caller is expected to save.
pub fn migrate(profile: &mut Profile) -> bool {
    if !needs_migration(profile) {
        return false;
    }

    for migration in MIGRATIONS {
        if profile.schema_version < migration.version {
            info!(
                target: "profile",
                "Applying migration {} (v{} -> v{})",
                migration.name, profile.schema_version, migration.version
            );
            (migration.apply)(profile);
            profile.schema_version = migration.version;
        }
    }

    // A current-version file can still be missing records if it was edited by hand.
    backfill_known_games(profile);
    true
}

/// Derives the staff reading, rhythm and interval records from the old
/// combined music theory record.
pub fn split_music_theory(profile: &mut Profile) {
    let split = GameType::music_split();
    let source = profile.record(GameType::MusicTheory).cloned();

    for game_type in split {
        if profile.games.contains_key(game_type.id()) {
            continue;
        }
        let record = match &source {
            Some(music) => GameRecord {
                level: music.level,
                games_played: music.games_played / split.len() as u32,
                games_won: music.games_won / split.len() as u32,
                current_difficulty: music.current_difficulty,
                history: Default::default(),
            },
            None => GameRecord::default(),
        };
        profile.games.insert(game_type.id().to_string(), record);
    }
}

pub fn backfill_known_games(profile: &mut Profile) {
    for game_type in GameType::all() {
        profile
            .games
            .entry(game_type.id().to_string())
            .or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_history_entry, Difficulty};

    fn legacy_profile() -> Profile {
        let mut profile = Profile::default();
        profile.schema_version = 0;
        for game_type in GameType::music_split() {
            profile.games.remove(game_type.id());
        }
        let music = profile.record_mut(GameType::MusicTheory);
        music.level = 2;
        music.games_played = 10;
        music.games_won = 8;
        music.current_difficulty = Difficulty::clamped(4);
        music.push_history(test_history_entry(true, 90));
        profile
    }

    #[test]
    fn test_split_floor_divides_counters() {
        let mut profile = legacy_profile();
        assert!(migrate(&mut profile));

        for game_type in GameType::music_split() {
            let record = profile.record(game_type).unwrap();
            assert_eq!(record.games_played, 3);
            assert_eq!(record.games_won, 2);
            assert_eq!(record.level, 2);
            assert_eq!(record.current_difficulty.value(), 4);
            assert!(record.history.is_empty());
        }
        // The source record is left alone.
        assert_eq!(profile.record(GameType::MusicTheory).unwrap().games_played, 10);
        assert_eq!(profile.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_split_without_music_zero_fills() {
        let mut profile = legacy_profile();
        profile.games.remove(GameType::MusicTheory.id());
        migrate(&mut profile);

        for game_type in GameType::music_split() {
            assert_eq!(profile.record(game_type), Some(&GameRecord::default()));
        }
        assert!(profile.has_all_known_games());
    }

    #[test]
    fn test_split_keeps_existing_records() {
        let mut profile = legacy_profile();
        profile.record_mut(GameType::Rhythm).games_played = 7;
        split_music_theory(&mut profile);
        assert_eq!(profile.record(GameType::Rhythm).unwrap().games_played, 7);
        assert_eq!(profile.record(GameType::Interval).unwrap().games_played, 3);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let mut once = legacy_profile();
        migrate(&mut once);

        let mut twice = once.clone();
        assert!(!migrate(&mut twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_each_step_is_idempotent() {
        for migration in MIGRATIONS {
            let mut once = legacy_profile();
            (migration.apply)(&mut once);
            let mut twice = once.clone();
            (migration.apply)(&mut twice);
            assert_eq!(once, twice, "step {} is not idempotent", migration.name);
        }
    }

    #[test]
    fn test_current_profile_is_untouched() {
        let mut profile = Profile::default();
        assert!(!needs_migration(&profile));
        assert!(!migrate(&mut profile));
    }

    #[test]
    fn test_hand_edited_current_file_is_backfilled() {
        let mut profile = Profile::default();
        profile.games.remove(GameType::Counting.id());
        assert!(migrate(&mut profile));
        assert!(profile.has_all_known_games());
    }

    #[test]
    fn test_steps_are_ordered() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(versions.last(), Some(&CURRENT_SCHEMA_VERSION));
    }
}
