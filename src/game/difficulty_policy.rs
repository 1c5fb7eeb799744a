//! The two independent difficulty computations.
//!
//! [`adjust_after_game`] nudges the stored `current_difficulty` of a record
//! after every finished game, looking only at the most recent results.
//! [`resolve_difficulty`] picks the level handed to the *next* game from a
//! manual override, the player's age and the all-time win rate. It never
//! reads `current_difficulty`, so the two numbers are free to diverge.

use chrono::{Datelike, NaiveDate};
use log::{debug, info};

use crate::config::AdaptiveSettings;
use crate::model::{Difficulty, GameRecord, GameType, Profile};

/// Games needed before the all-time win rate shifts the baseline.
const MIN_GAMES_FOR_WIN_RATE_NUDGE: u32 = 3;

/// Upper bounds (exclusive, in months of age) for base difficulties 1..=9.
/// Anything at or past the last bound is difficulty 10.
const AGE_TABLE: [i32; 9] = [42, 48, 54, 60, 66, 72, 84, 96, 108];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Raised(Difficulty),
    Lowered(Difficulty),
    Unchanged,
}

/// Applies the post-game rule to `record` and reports what happened.
///
/// The success rate is measured over exactly `min_games_before_adjust`
/// games; with fewer on record nothing changes. Steps are always one level.
pub fn adjust_after_game(record: &mut GameRecord, settings: &AdaptiveSettings) -> Adjustment {
    let Some(success_rate) = record.recent_success_rate(settings.min_games_before_adjust) else {
        return Adjustment::Unchanged;
    };

    let current = record.current_difficulty;
    let adjustment = if success_rate >= settings.difficulty_increase_threshold {
        let raised = current.shifted(1);
        if raised == current {
            Adjustment::Unchanged
        } else {
            Adjustment::Raised(raised)
        }
    } else if success_rate <= settings.difficulty_decrease_threshold {
        let lowered = current.shifted(-1);
        if lowered == current {
            Adjustment::Unchanged
        } else {
            Adjustment::Lowered(lowered)
        }
    } else {
        Adjustment::Unchanged
    };

    match adjustment {
        Adjustment::Raised(d) | Adjustment::Lowered(d) => {
            info!(
                target: "difficulty",
                "Success rate {:.2}: difficulty {} -> {}",
                success_rate, current, d
            );
            record.current_difficulty = d;
        }
        Adjustment::Unchanged => {
            debug!(target: "difficulty", "Success rate {:.2}: difficulty stays {}", success_rate, current);
        }
    }
    adjustment
}

/// Picks the difficulty for the next game of `game_type`.
pub fn resolve_difficulty(profile: &Profile, game_type: GameType, today: NaiveDate) -> Difficulty {
    if let Some(value) = profile.difficulty_settings.get(game_type.id()) {
        return Difficulty::clamped(*value);
    }

    let base = profile
        .birth_date
        .as_deref()
        .and_then(parse_birth_date)
        .map(|birth| base_difficulty_for_age(months_between(birth, today)))
        .unwrap_or(Difficulty::MEDIUM);

    match profile.record(game_type) {
        Some(record) => base.shifted(win_rate_nudge(record)),
        None => base,
    }
}

/// Parses a stored `YYYY-MM-DD` birth date. Single-digit months and days
/// are accepted; anything else yields `None`.
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Calendar months between two dates, ignoring the day of month.
pub fn months_between(birth: NaiveDate, today: NaiveDate) -> i32 {
    (today.year() - birth.year()) * 12 + today.month() as i32 - birth.month() as i32
}

pub fn base_difficulty_for_age(months: i32) -> Difficulty {
    let level = AGE_TABLE
        .iter()
        .position(|bound| months < *bound)
        .unwrap_or(AGE_TABLE.len());
    Difficulty::clamped(level as i64 + 1)
}

fn win_rate_nudge(record: &GameRecord) -> i64 {
    if record.games_played <= MIN_GAMES_FOR_WIN_RATE_NUDGE {
        return 0;
    }
    let win_rate = record.win_rate();
    if win_rate > 0.9 {
        2
    } else if win_rate > 0.8 {
        1
    } else if win_rate < 0.2 {
        -2
    } else if win_rate < 0.3 {
        -1
    } else {
        0
    }
}
