use chrono::NaiveDate;

use crate::error::SettingsError;
use crate::game::difficulty_policy::months_between;
use crate::model::Difficulty;

/// Youngest age, in months, the games are tuned for.
pub const MIN_AGE_MONTHS: i32 = 36;
/// Oldest age, in months, the games are tuned for.
pub const MAX_AGE_MONTHS: i32 = 120;

/// Checks a birth date entered on the settings screen.
pub fn validate_birth_date(
    year: i32,
    month: u32,
    day: u32,
    today: NaiveDate,
) -> Result<NaiveDate, SettingsError> {
    let birth = NaiveDate::from_ymd_opt(year, month, day).ok_or(SettingsError::InvalidDate)?;
    if birth > today {
        return Err(SettingsError::FutureDate);
    }
    let months = months_between(birth, today);
    if months < MIN_AGE_MONTHS {
        return Err(SettingsError::TooYoung { months });
    }
    if months > MAX_AGE_MONTHS {
        return Err(SettingsError::TooOld { months });
    }
    Ok(birth)
}

/// Storage form of a birth date, always zero padded.
pub fn format_birth_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn validate_difficulty_override(value: i64) -> Result<Difficulty, SettingsError> {
    Difficulty::new(value).ok_or(SettingsError::DifficultyOutOfRange(value))
}
