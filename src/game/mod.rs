pub mod difficulty_policy;
pub mod game_manager;
pub mod migrations;
pub mod mini_game;
pub mod profile_store;
pub mod progress;
pub mod settings;
pub mod shell;

pub use difficulty_policy::{resolve_difficulty, Adjustment};
pub use game_manager::{reward_for, GameManager};
pub use mini_game::{Canvas, Color, GameFactory, MiniGame, Point, Rect};
pub use profile_store::ProfileStore;
pub use progress::ProgressTracker;
pub use shell::{GameShell, ShellState};
