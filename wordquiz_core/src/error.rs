//! Error types shared by every WordQuiz module

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("One or more languages specified are invalid")]
    InvalidLanguage,

    #[error("The home language was set to {0}, expected 1 or 2")]
    InvalidHomeLanguage(i64),

    #[error("Unable to load {path:?}: {reason}")]
    LoadFileFailure { path: PathBuf, reason: String },

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("The word '{0}' is empty or contains a tab or line break")]
    InvalidWord(String),

    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Languages <{found_lang1}, {found_lang2}> do not belong in a <{lang1}, {lang2}> list")]
    LanguageMismatch {
        lang1: String,
        lang2: String,
        found_lang1: String,
        found_lang2: String,
    },

    #[error("No prompt has been issued")]
    NoPromptIssued,

    #[error("The current prompt has already been answered")]
    PromptAlreadyAnswered,

    #[error("Option {0} is not one of the offered choices")]
    InvalidChoice(usize),

    #[error("The username '{0}' is invalid")]
    InvalidUsername(String),

    #[error("No such user profile: {0}")]
    NoSuchProfile(String),

    #[error("A profile already exists for {0}")]
    ProfileExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl QuizError {
    pub(crate) fn load_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        QuizError::LoadFileFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<QuizError> for String {
    fn from(err: QuizError) -> Self {
        err.to_string()
    }
}

/// Result type alias for WordQuiz operations
pub type Result<T> = std::result::Result<T, QuizError>;
