//! Locating profile files by username
//!
//! Each profile lives in `<profiles_dir>/<username>.profile`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QuizError, Result};
use crate::master_list::LoadReport;
use crate::profile::UserProfile;
use crate::settings::Settings;

const PROFILE_EXTENSION: &str = "profile";

#[derive(Debug, Clone)]
pub struct ProfileManager {
    profiles_dir: PathBuf,
}

impl ProfileManager {
    pub fn new(profiles_dir: impl Into<PathBuf>) -> Self {
        ProfileManager {
            profiles_dir: profiles_dir.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.profiles_dir.clone())
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    /// Non-empty, and only ASCII letters, digits, `-` and `_`, so the
    /// name is always a safe file name.
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn profile_path(&self, username: &str) -> Result<PathBuf> {
        if !Self::is_valid_username(username) {
            return Err(QuizError::InvalidUsername(username.to_string()));
        }
        Ok(self
            .profiles_dir
            .join(format!("{}.{}", username, PROFILE_EXTENSION)))
    }

    pub fn profile_exists(&self, username: &str) -> bool {
        self.profile_path(username)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Creates and saves an empty profile.
    pub fn create_new_profile(&self, username: &str, full_name: &str) -> Result<UserProfile> {
        let path = self.profile_path(username)?;
        if path.exists() {
            return Err(QuizError::ProfileExists(username.to_string()));
        }

        let profile = UserProfile::new(username, full_name)?;
        fs::create_dir_all(&self.profiles_dir)?;
        profile.save_to_file(&path)?;

        log::info!("Created profile '{}' at {:?}", username, path);
        Ok(profile)
    }

    pub fn load_profile(&self, username: &str) -> Result<(UserProfile, LoadReport)> {
        let path = self.profile_path(username)?;
        if !path.is_file() {
            return Err(QuizError::NoSuchProfile(username.to_string()));
        }
        UserProfile::load_from_file(&path)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let path = self.profile_path(profile.username())?;
        fs::create_dir_all(&self.profiles_dir)?;
        profile.save_to_file(path)
    }

    /// Usernames with a profile file, sorted.
    pub fn list_profiles(&self) -> Result<Vec<String>> {
        if !self.profiles_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if Self::is_valid_username(stem) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
