use std::time::SystemTime;

use chrono::{Local, NaiveDate};
use log::{debug, info};

use super::difficulty_policy::resolve_difficulty;
use super::profile_store::ProfileStore;
use super::progress::ProgressTracker;
use crate::config::{Config, BASE_COINS};
use crate::error::StoreError;
use crate::model::{Difficulty, GameType, Reward, Session};

/// Coins scale with the difficulty the player has reached; stars with the
/// score. Losing earns nothing.
pub fn reward_for(won: bool, score: i64, difficulty: Difficulty) -> Reward {
    if !won {
        return Reward::default();
    }
    // floor(BASE * (1 + difficulty / 10)), kept in integers
    let coins = BASE_COINS + BASE_COINS * difficulty.value() as u64 / 10;
    let stars = if score >= 90 {
        3
    } else if score >= 70 {
        2
    } else {
        1
    };
    Reward { coins, stars }
}

/// The entry point the menu shell talks to: one active session at a time,
/// on top of the persisted progress.
#[derive(Debug)]
pub struct GameManager {
    progress: ProgressTracker,
    current_session: Option<Session>,
    sound_enabled: bool,
    music_enabled: bool,
}

impl GameManager {
    pub fn new(progress: ProgressTracker) -> Self {
        Self {
            progress,
            current_session: None,
            sound_enabled: true,
            music_enabled: true,
        }
    }

    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let progress = ProgressTracker::open(ProfileStore::from_config(config))?;
        Ok(Self::new(progress))
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressTracker {
        &mut self.progress
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current_session.as_ref()
    }

    pub fn start_game(&mut self, game_type: GameType) {
        self.start_game_at(game_type, SystemTime::now());
    }

    /// Begins a session. An unfinished previous session is dropped without
    /// being recorded.
    pub fn start_game_at(&mut self, game_type: GameType, now: SystemTime) {
        let session = Session::start(game_type, now);
        if let Some(previous) = self.current_session.replace(session) {
            debug!(
                target: "session",
                "Discarding unfinished {} session {}",
                previous.game_type, previous.playthrough_id
            );
        }
        if let Some(session) = &self.current_session {
            info!(
                target: "session",
                "Started {} session {}",
                session.game_type, session.playthrough_id
            );
        }
    }

    /// Drops the active session without recording it. Returns the discarded
    /// session, if there was one.
    pub fn abandon_game(&mut self) -> Option<Session> {
        let session = self.current_session.take()?;
        info!(
            target: "session",
            "Abandoned {} session {}",
            session.game_type, session.playthrough_id
        );
        Some(session)
    }

    pub fn end_game(
        &mut self,
        won: bool,
        score: i64,
        details: Option<serde_json::Value>,
    ) -> Result<Reward, StoreError> {
        self.end_game_at(won, score, details, SystemTime::now())
    }

    /// Records the active session and pays out its reward. Without an active
    /// session this does nothing and returns an empty reward.
    pub fn end_game_at(
        &mut self,
        won: bool,
        score: i64,
        details: Option<serde_json::Value>,
        now: SystemTime,
    ) -> Result<Reward, StoreError> {
        let Some(session) = self.current_session.take() else {
            return Ok(Reward::default());
        };
        let time_taken = session.elapsed(now).as_secs_f64();

        self.progress
            .record_game_result(session.game_type, won, score, time_taken, details)?;

        let reward = reward_for(won, score, self.progress.current_difficulty(session.game_type));
        if reward.coins > 0 {
            self.progress.add_coins(reward.coins)?;
        }
        if reward.stars > 0 {
            self.progress.add_stars(reward.stars)?;
        }
        info!(
            target: "session",
            "Finished {} session {}: won={} score={} time={:.1}s reward={:?}",
            session.game_type, session.playthrough_id, won, score, time_taken, reward
        );
        Ok(reward)
    }

    /// Difficulty to construct the next game of `game_type` with.
    pub fn get_difficulty(&self, game_type: GameType) -> Difficulty {
        self.difficulty_on(game_type, Local::now().date_naive())
    }

    pub fn difficulty_on(&self, game_type: GameType, today: NaiveDate) -> Difficulty {
        resolve_difficulty(self.progress.profile(), game_type, today)
    }

    pub fn get_player_name(&self) -> &str {
        self.progress.player_name()
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.progress.set_player_name(name)
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }
}
