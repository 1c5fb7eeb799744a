use std::process::ExitCode;
use std::time::Duration;

use itertools::Itertools;
use log::error;

use smartkids::audio::{wait_for_speech, CommandSpeech, SilentSpeech, SpeechService};
use smartkids::config::Config;
use smartkids::game::GameManager;
use smartkids::model::GameType;

const GREETING_TIMEOUT: Duration = Duration::from_secs(3);

fn init_logging() {
    env_logger::init();
}

fn print_report(manager: &GameManager) {
    let progress = manager.progress();
    let profile = progress.profile();
    println!("Player: {}", manager.get_player_name());
    println!(
        "Coins: {}  Stars: {}  Achievements: {}",
        profile.total_coins,
        profile.total_stars,
        profile.achievements.len()
    );
    if let Some(months) = progress.age_in_months(chrono::Local::now().date_naive()) {
        println!("Age: {} months", months);
    }
    println!();
    println!(
        "{:<16} {:>6} {:>6} {:>6} {:>8} {:>6}  recent",
        "game", "played", "won", "rate", "current", "next"
    );
    for game_type in GameType::all() {
        let stats = progress.game_stats(game_type);
        let recent = stats
            .recent_performance
            .iter()
            .map(|won| if *won { "W" } else { "-" })
            .join("");
        println!(
            "{:<16} {:>6} {:>6} {:>5.0}% {:>8} {:>6}  {}",
            game_type.id(),
            stats.games_played,
            stats.games_won,
            stats.win_rate * 100.0,
            stats.current_difficulty,
            manager.get_difficulty(game_type),
            recent
        );
    }
}

fn main() -> ExitCode {
    init_logging();

    let config = Config::from_env();
    if Config::is_debug_mode() {
        println!("Progress file: {:?}", config.save_path());
    }

    let manager = match GameManager::open(&config) {
        Ok(manager) => manager,
        Err(err) => {
            error!("Could not open progress: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let speech: Box<dyn SpeechService> = if config.speech_enabled {
        Box::new(CommandSpeech::for_platform())
    } else {
        Box::new(SilentSpeech)
    };
    speech.speak(&format!("你好，{}！", manager.get_player_name()));

    print_report(&manager);

    wait_for_speech(speech.as_ref(), GREETING_TIMEOUT);
    speech.shutdown();
    ExitCode::SUCCESS
}
