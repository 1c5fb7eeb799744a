use std::env;
use std::path::PathBuf;

pub const SAVE_FILE_NAME: &str = "progress.json";

/// Tuning for the post-game difficulty rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSettings {
    /// Informational only; the rule acts on the two thresholds.
    pub success_rate_target: f64,
    /// Games required before any adjustment, and the size of the window
    /// the success rate is measured over.
    pub min_games_before_adjust: usize,
    pub difficulty_increase_threshold: f64,
    pub difficulty_decrease_threshold: f64,
}

pub const ADAPTIVE_SETTINGS: AdaptiveSettings = AdaptiveSettings {
    success_rate_target: 0.7,
    min_games_before_adjust: 5,
    difficulty_increase_threshold: 0.85,
    difficulty_decrease_threshold: 0.55,
};

pub const BASE_COINS: u64 = 10;
/// Recent outcomes reported in stats.
pub const RECENT_PERFORMANCE_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub speech_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            speech_enabled: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            data_dir: env::var_os("SMARTKIDS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            speech_enabled: env::var("SMARTKIDS_SPEECH")
                .map(|v| v != "0")
                .unwrap_or(defaults.speech_enabled),
        }
    }

    pub fn save_path(&self) -> PathBuf {
        self.data_dir.join(SAVE_FILE_NAME)
    }

    pub fn is_debug_mode() -> bool {
        env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("SMARTKIDS_DATA_DIR");
        env::remove_var("SMARTKIDS_SPEECH");
        let config = Config::from_env();
        assert_eq!(config, Config::default());
        assert_eq!(config.save_path(), PathBuf::from("data").join("progress.json"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("SMARTKIDS_DATA_DIR", "/tmp/smartkids-test");
        env::set_var("SMARTKIDS_SPEECH", "0");
        let config = Config::from_env();
        env::remove_var("SMARTKIDS_DATA_DIR");
        env::remove_var("SMARTKIDS_SPEECH");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/smartkids-test"));
        assert!(!config.speech_enabled);
    }
}
