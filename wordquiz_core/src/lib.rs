//! WordQuiz Core - word lists and quiz sessions for a vocabulary trainer
//!
//! Provides the connection/language-pair data model, word lists with sorting
//! and file import, free-text and multiple-choice quizzes, user profiles, and
//! an SQLite attempt log.

mod connection;
mod db;
mod error;
mod fuzzy;
mod language_pair;
mod master_list;
mod profile;
mod profile_manager;
mod progress;
mod questions;
mod quiz;
mod quiz_list;
mod settings;
mod spreadsheet;

pub use connection::{Connection, DEFAULT_PROFICIENCY, MAX_PROFICIENCY};
pub use db::{init_database, open_in_memory};
pub use error::{QuizError, Result};
pub use fuzzy::{closest_match, similarity, NearMiss, DEFAULT_NEAR_MISS_THRESHOLD};
pub use language_pair::LanguagePair;
pub use master_list::{LoadReport, MasterList, SkippedLine};
pub use profile::UserProfile;
pub use profile_manager::ProfileManager;
pub use progress::{AttemptLog, AttemptStats, MissedWord};
pub use questions::{MultipleChoiceVocabQuiz, MAX_OPTIONS};
pub use quiz::{
    AnswerEvent, AnswerObserver, Direction, FillInVocabQuiz, Quiz, QuizState, SelectionPolicy,
};
pub use quiz_list::{QuizList, QuizSource};
pub use settings::{Settings, DEFAULT_PROFILES_DIR};
pub use spreadsheet::{import_csv, import_spreadsheet};
