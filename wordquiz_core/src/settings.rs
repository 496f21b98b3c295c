//! Quiz defaults and storage locations, read from a JSON file
//!
//! ```json
//! {
//!   "profiles_dir": "profiles",
//!   "case_sensitive": false,
//!   "direction": "standard",
//!   "selection": "sequential",
//!   "near_miss_threshold": 0.8,
//!   "attempt_db": "attempts.sqlite"
//! }
//! ```
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::fuzzy::DEFAULT_NEAR_MISS_THRESHOLD;
use crate::quiz::{Direction, SelectionPolicy};

pub const DEFAULT_PROFILES_DIR: &str = "profiles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profiles_dir: PathBuf,
    pub case_sensitive: bool,
    pub direction: Direction,
    pub selection: SelectionPolicy,
    pub near_miss_threshold: f64,
    /// SQLite file for the attempt log; no log is kept when unset
    pub attempt_db: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            profiles_dir: PathBuf::from(DEFAULT_PROFILES_DIR),
            case_sensitive: false,
            direction: Direction::Standard,
            selection: SelectionPolicy::Sequential,
            near_miss_threshold: DEFAULT_NEAR_MISS_THRESHOLD,
            attempt_db: None,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            QuizError::load_failure(path, format!("{}. Please ensure it exists.", e))
        })?;
        let settings: Settings = serde_json::from_str(&contents)?;

        if !(0.0..=1.0).contains(&settings.near_miss_threshold) {
            return Err(QuizError::load_failure(
                path,
                format!(
                    "near_miss_threshold {} must be between 0 and 1",
                    settings.near_miss_threshold
                ),
            ));
        }

        Ok(settings)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Ok(Settings::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "direction": "reverse", "selection": "random" }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.direction, Direction::Reverse);
        assert_eq!(settings.selection, SelectionPolicy::Random);
        assert_eq!(settings.profiles_dir, PathBuf::from(DEFAULT_PROFILES_DIR));
        assert!(!settings.case_sensitive);
        assert!(settings.attempt_db.is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(Settings::load(&path), Err(QuizError::LoadFileFailure { .. })));
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, r#"{ "direction": "sideways" }"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(QuizError::Json(_))));

        fs::write(&path, r#"{ "near_miss_threshold": 1.5 }"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(QuizError::LoadFileFailure { .. })));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            case_sensitive: true,
            attempt_db: Some(dir.path().join("attempts.sqlite")),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
