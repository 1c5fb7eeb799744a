use std::time::Duration;

use crate::model::{Difficulty, GameResult, GameType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

/// Whatever the shell renders into.
pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, at: Point, size: u16, color: Color);
}

/// One playable mini-game, constructed for a single difficulty.
pub trait MiniGame {
    fn handle_click(&mut self, pos: Point);
    fn update(&mut self, dt: Duration);
    fn draw(&self, canvas: &mut dyn Canvas);
    fn is_complete(&self) -> bool;
    fn result(&self) -> GameResult;
}

/// Builds a game instance for a menu choice; `None` if the game is not
/// available in this build.
pub trait GameFactory {
    fn create(&self, game_type: GameType, difficulty: Difficulty) -> Option<Box<dyn MiniGame>>;
}

impl<F> GameFactory for F
where
    F: Fn(GameType, Difficulty) -> Option<Box<dyn MiniGame>>,
{
    fn create(&self, game_type: GameType, difficulty: Difficulty) -> Option<Box<dyn MiniGame>> {
        self(game_type, difficulty)
    }
}
