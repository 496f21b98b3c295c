//! Progress tracking - attempt storage and statistics
//!
//! `AttemptLog` is an [`AnswerObserver`]: hand it to a quiz and every scored
//! answer lands in SQLite. It only records. Proficiency and recency on the
//! connections are left alone.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection as Database};
use serde::Serialize;

use crate::db;
use crate::error::Result;
use crate::language_pair::LanguagePair;
use crate::quiz::{AnswerEvent, AnswerObserver, Direction};
use crate::settings::Settings;

/// Attempt statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptStats {
    pub total_attempts: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub accuracy_percent: f64,
}

impl AttemptStats {
    fn from_counts(total: i64, correct: i64) -> Self {
        let accuracy = if total > 0 {
            (correct as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        AttemptStats {
            total_attempts: total,
            correct_count: correct,
            incorrect_count: total - correct,
            accuracy_percent: accuracy,
        }
    }
}

/// A connection and how often it was answered wrongly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissedWord {
    pub lang1: String,
    pub lang2: String,
    pub word1: String,
    pub word2: String,
    pub misses: i64,
}

pub struct AttemptLog {
    db: Database,
}

impl AttemptLog {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(AttemptLog {
            db: db::init_database(db_path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(AttemptLog {
            db: db::open_in_memory()?,
        })
    }

    /// The log configured in `settings`, if any.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        settings.attempt_db.as_ref().map(Self::open).transpose()
    }

    /// Save an attempt to the database
    pub fn record(&self, event: &AnswerEvent<'_>) -> Result<()> {
        let conn = event.connection;
        let direction = match event.direction {
            Direction::Standard => "standard",
            Direction::Reverse => "reverse",
        };

        self.db.execute(
            "INSERT INTO attempts (lang1, lang2, word1, word2, direction, prompt, answer, expected, is_correct, attempted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                conn.lang1(),
                conn.lang2(),
                conn.word1(),
                conn.word2(),
                direction,
                event.prompt,
                event.answer,
                event.expected,
                event.correct as i32,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get overall statistics
    pub fn stats(&self) -> Result<AttemptStats> {
        let (total, correct) = self.db.query_row(
            "SELECT COUNT(*), SUM(is_correct) FROM attempts",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?.unwrap_or(0))),
        )?;
        Ok(AttemptStats::from_counts(total, correct))
    }

    /// Statistics for one language pair (home language ignored)
    pub fn stats_for(&self, languages: &LanguagePair) -> Result<AttemptStats> {
        let (total, correct) = self.db.query_row(
            "SELECT COUNT(*), SUM(is_correct) FROM attempts
             WHERE lang1 = ?1 COLLATE NOCASE AND lang2 = ?2 COLLATE NOCASE",
            params![languages.lang1(), languages.lang2()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?.unwrap_or(0))),
        )?;
        Ok(AttemptStats::from_counts(total, correct))
    }

    /// Connections answered wrongly, most misses first
    pub fn most_missed(&self, limit: usize) -> Result<Vec<MissedWord>> {
        let mut stmt = self.db.prepare(
            "SELECT lang1, lang2, word1, word2, COUNT(*) AS misses
             FROM attempts
             WHERE is_correct = 0
             GROUP BY lang1, lang2, word1, word2
             ORDER BY misses DESC, word1 ASC, word2 ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(MissedWord {
                lang1: row.get(0)?,
                lang2: row.get(1)?,
                word1: row.get(2)?,
                word2: row.get(3)?,
                misses: row.get(4)?,
            })
        })?;

        let mut missed = Vec::new();
        for row in rows {
            missed.push(row?);
        }
        Ok(missed)
    }
}

impl AnswerObserver for AttemptLog {
    fn on_answered(&mut self, event: &AnswerEvent<'_>) {
        if let Err(err) = self.record(event) {
            log::warn!("Failed to record attempt for '{}': {}", event.prompt, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{FillInVocabQuiz, Quiz};
    use crate::quiz_list::QuizList;

    fn animals() -> QuizList {
        let mut list = QuizList::new("Animals", "English", "German").unwrap();
        list.add_words("dog", "Hund").unwrap();
        list.add_words("cat", "Katze").unwrap();
        list.add_words("bird", "Vogel").unwrap();
        list
    }

    #[test]
    fn test_empty_log() {
        let log = AttemptLog::in_memory().unwrap();
        let stats = log.stats().unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.accuracy_percent, 0.0);
        assert!(log.most_missed(5).unwrap().is_empty());
    }

    #[test]
    fn test_quiz_answers_are_recorded() {
        let list = animals();
        let mut log = AttemptLog::in_memory().unwrap();

        for _ in 0..2 {
            let mut quiz = FillInVocabQuiz::new(&list);
            quiz.set_observer(&mut log);
            while let Some(prompt) = quiz.next_prompt() {
                let answer = match prompt.as_str() {
                    "dog" => "Hund",
                    "cat" => "Katz",
                    _ => "Spatz",
                };
                quiz.check_answer(answer).unwrap();
            }
        }

        let stats = log.stats().unwrap();
        assert_eq!(stats.total_attempts, 6);
        assert_eq!(stats.correct_count, 2);
        assert_eq!(stats.incorrect_count, 4);
        assert!((stats.accuracy_percent - 100.0 / 3.0).abs() < 1e-9);

        let missed = log.most_missed(1).unwrap();
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].word1, "bird");
        assert_eq!(missed[0].misses, 2);
        assert_eq!(log.most_missed(10).unwrap().len(), 2);
    }

    #[test]
    fn test_stats_per_pair() {
        let list = animals();
        let mut log = AttemptLog::in_memory().unwrap();
        {
            let mut quiz = FillInVocabQuiz::new(&list);
            quiz.set_observer(&mut log);
            quiz.next_prompt();
            quiz.check_answer("Hund").unwrap();
        }

        let german = LanguagePair::new("german", "ENGLISH", 1).unwrap();
        let french = LanguagePair::new("English", "French", 1).unwrap();
        assert_eq!(log.stats_for(&german).unwrap().correct_count, 1);
        assert_eq!(log.stats_for(&french).unwrap().total_attempts, 0);
    }

    #[test]
    fn test_from_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AttemptLog::from_settings(&Settings::default()).unwrap().is_none());

        let settings = Settings {
            attempt_db: Some(dir.path().join("attempts.sqlite")),
            ..Settings::default()
        };
        let log = AttemptLog::from_settings(&settings).unwrap().unwrap();
        assert_eq!(log.stats().unwrap().total_attempts, 0);
    }
}
