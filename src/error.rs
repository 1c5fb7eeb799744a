use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not write progress file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode progress: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections shown to the player (or parent) on the settings screen.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("that is not a real date")]
    InvalidDate,
    #[error("the birth date cannot be in the future")]
    FutureDate,
    #[error("age must be at least 3 years (got {months} months)")]
    TooYoung { months: i32 },
    #[error("age must be at most 10 years (got {months} months)")]
    TooOld { months: i32 },
    #[error("difficulty must be between 1 and 10 (got {0})")]
    DifficultyOutOfRange(i64),
    #[error("unknown game: {0}")]
    UnknownGameType(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
