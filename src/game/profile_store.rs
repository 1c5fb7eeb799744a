use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::model::{timestamp, Profile};

/// Reads and writes the single progress file.
///
/// No locking is done: with two processes on the same file the last writer
/// wins.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.save_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved profile, or a fresh one if there is nothing usable on
    /// disk. Never fails.
    pub fn load(&self) -> Profile {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Profile>(&contents) {
                Ok(mut profile) => {
                    debug!(target: "profile", "Loaded progress from {:?}", self.path);
                    if profile.normalize() {
                        warn!(target: "profile", "Capped games_won at games_played in {:?}", self.path);
                    }
                    return profile;
                }
                Err(err) => {
                    warn!(
                        target: "profile",
                        "Ignoring unreadable progress file {:?}: {}", self.path, err
                    );
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: "profile", "No progress file at {:?}; first run", self.path);
            }
            Err(err) => {
                warn!(target: "profile", "Could not read {:?}: {}", self.path, err);
            }
        }
        Profile::default()
    }

    /// Stamps `last_played` and writes the profile as indented UTF-8 JSON.
    pub fn save(&self, profile: &mut Profile) -> Result<(), StoreError> {
        profile.last_played = timestamp::now();
        self.write(profile)
    }

    fn write(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, contents)?;
        trace!(target: "profile", "Saved progress to {:?}", self.path);
        Ok(())
    }
}
