mod difficulty;
mod game_record;
mod game_result;
mod game_stats;
mod game_type;
mod profile;
mod session;
pub mod timestamp;

pub use difficulty::Difficulty;
pub use game_record::{GameRecord, HistoryEntry, HISTORY_CAP};
pub use game_result::GameResult;
pub use game_stats::{GameStats, Reward};
pub use game_type::GameType;
pub use profile::{Profile, CURRENT_SCHEMA_VERSION, DEFAULT_PLAYER_NAME};
pub use session::Session;

#[cfg(test)]
pub(crate) use game_record::tests::entry as test_history_entry;
