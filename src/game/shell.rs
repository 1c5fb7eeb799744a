use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

use super::game_manager::GameManager;
use super::mini_game::{Canvas, GameFactory, MiniGame, Point};
use crate::audio::SpeechService;
use crate::error::StoreError;
use crate::model::{GameType, Reward};

/// Minimum time the result screen stays up.
pub const FINISH_MIN_DELAY: Duration = Duration::from_secs(2);
/// The result screen never waits on speech longer than this.
pub const FINISH_MAX_DELAY: Duration = Duration::from_secs(5);

const WIN_PHRASES: &[&str] = &["太棒了！", "答对了！真棒！", "你真厉害！", "做得好！"];
const TRY_AGAIN_PHRASES: &[&str] = &["没关系，再试试看！", "加油！再来一次！", "差一点点就成功了！"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Menu,
    Playing(GameType),
    Finishing { game_type: GameType, elapsed: Duration },
}

/// Frame-driven loop around the mini-games: menu, play, result screen,
/// back to the menu.
pub struct GameShell<F: GameFactory, S: SpeechService> {
    manager: GameManager,
    factory: F,
    speech: S,
    current_game: Option<Box<dyn MiniGame>>,
    state: ShellState,
    last_reward: Option<Reward>,
}

impl<F: GameFactory, S: SpeechService> GameShell<F, S> {
    pub fn new(manager: GameManager, factory: F, speech: S) -> Self {
        Self {
            manager,
            factory,
            speech,
            current_game: None,
            state: ShellState::Menu,
            last_reward: None,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn manager(&self) -> &GameManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut GameManager {
        &mut self.manager
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn last_reward(&self) -> Option<Reward> {
        self.last_reward
    }

    /// Builds the chosen game at its resolved difficulty and opens a session.
    /// Returns `false` if the factory has no such game.
    pub fn start_game(&mut self, game_type: GameType) -> bool {
        let difficulty = self.manager.get_difficulty(game_type);
        let Some(game) = self.factory.create(game_type, difficulty) else {
            warn!(target: "session", "No game available for {}", game_type);
            return false;
        };
        debug!(target: "session", "Building {} at difficulty {}", game_type, difficulty);
        self.current_game = Some(game);
        self.last_reward = None;
        self.manager.start_game(game_type);
        self.state = ShellState::Playing(game_type);
        true
    }

    pub fn handle_click(&mut self, pos: Point) {
        if let ShellState::Playing(_) = self.state {
            if let Some(game) = self.current_game.as_mut() {
                game.handle_click(pos);
            }
        }
    }

    /// Advances one frame. Persisting a finished game is the only fallible step.
    pub fn update(&mut self, dt: Duration) -> Result<(), StoreError> {
        match self.state {
            ShellState::Menu => {}
            ShellState::Playing(game_type) => {
                let complete = match self.current_game.as_mut() {
                    Some(game) => {
                        game.update(dt);
                        game.is_complete()
                    }
                    None => false,
                };
                if complete {
                    self.finish(game_type)?;
                }
            }
            ShellState::Finishing { game_type, elapsed } => {
                if let Some(game) = self.current_game.as_mut() {
                    game.update(dt);
                }
                let elapsed = elapsed + dt;
                let speech_done = !self.speech.is_speaking() && elapsed > FINISH_MIN_DELAY;
                if speech_done || elapsed > FINISH_MAX_DELAY {
                    self.return_to_menu();
                } else {
                    self.state = ShellState::Finishing { game_type, elapsed };
                }
            }
        }
        Ok(())
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(game) = self.current_game.as_ref() {
            game.draw(canvas);
        }
    }

    /// Leaves the current game. A game quit before completion is not recorded.
    pub fn return_to_menu(&mut self) {
        if let ShellState::Playing(_) = self.state {
            self.manager.abandon_game();
        }
        self.current_game = None;
        self.state = ShellState::Menu;
    }

    pub fn shutdown(&mut self) {
        self.return_to_menu();
        self.speech.shutdown();
    }

    fn finish(&mut self, game_type: GameType) -> Result<(), StoreError> {
        let Some(result) = self.current_game.as_ref().map(|game| game.result()) else {
            return Ok(());
        };
        let won = result.is_win();
        let reward = self.manager.end_game(won, result.score, result.details)?;
        self.last_reward = Some(reward);
        self.announce(won, reward);
        self.state = ShellState::Finishing {
            game_type,
            elapsed: Duration::ZERO,
        };
        Ok(())
    }

    fn announce(&self, won: bool, reward: Reward) {
        if !self.manager.sound_enabled() {
            return;
        }
        let phrases = if won { WIN_PHRASES } else { TRY_AGAIN_PHRASES };
        let phrase = phrases[rand::rng().random_range(0..phrases.len())];
        let text = match reward.stars {
            0 => phrase.to_string(),
            n => format!("{}你得到了{}颗星星！", phrase, n),
        };
        self.speech.speak(&text);
    }
}
