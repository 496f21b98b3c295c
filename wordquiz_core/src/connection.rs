//! A correspondence of meaning between two words in different languages
//!
//! Languages are kept in alphabetical order (ignoring case): `lang1` always
//! precedes `lang2`, and `word1` is always the word in `lang1`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::error::{QuizError, Result};
use crate::language_pair::{compare_ignore_case, is_storable, languages_equal, tab_fields};

/// A newly loaded word is assigned this proficiency.
pub const DEFAULT_PROFICIENCY: u8 = 30;

/// Proficiency is a rating from 0 to 100.
pub const MAX_PROFICIENCY: u8 = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connection {
    lang1: String,
    lang2: String,
    word1: String,
    word2: String,
    proficiency: u8,
    last_quizzed: DateTime<Utc>,
    valid: bool,
}

impl Connection {
    /// `word1` is the word in `lang1`; the languages may be given in any order.
    pub fn new(lang1: &str, lang2: &str, word1: &str, word2: &str) -> Result<Self> {
        if !is_storable(lang1) || !is_storable(lang2) || languages_equal(lang1, lang2) {
            return Err(QuizError::InvalidLanguage);
        }
        for word in [word1, word2] {
            if !is_storable(word) {
                return Err(QuizError::InvalidWord(word.to_string()));
            }
        }

        let mut conn = Connection {
            proficiency: DEFAULT_PROFICIENCY,
            valid: true,
            ..Default::default()
        };
        conn.store_in_correct_order(lang1, lang2, word1, word2);
        Ok(conn)
    }

    /// A placeholder carrying no data; `is_valid()` is false.
    pub fn invalid() -> Self {
        Connection::default()
    }

    /// Parses `word1 \t word2 [\t proficiency [\t lastQuizzed]]`, where the
    /// words are in `lang1`/`lang2` order as given by the caller.
    pub fn load_from_line(line: &str, lang1: &str, lang2: &str) -> Result<Self> {
        let fields = tab_fields(line);
        if fields.len() < 2 {
            return Err(QuizError::ParseFailure(format!(
                "expected at least two words, found '{}'",
                line.trim_end()
            )));
        }

        let mut conn = Connection::new(lang1, lang2, fields[0], fields[1])?;

        if let Some(raw) = fields.get(2) {
            conn.proficiency = parse_proficiency(raw)?;
        }
        if let Some(raw) = fields.get(3) {
            conn.last_quizzed = parse_timestamp(raw)?;
        }

        Ok(conn)
    }

    /// `word1 \t word2 \t proficiency \t lastQuizzed`, without a line terminator.
    pub fn export_to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.word1,
            self.word2,
            self.proficiency,
            self.last_quizzed.timestamp()
        )
    }

    /// Compares languages (always ignoring case) and words (per `case_sensitive`).
    /// Proficiency and recency are not part of the comparison.
    pub fn basic_equals(&self, other: &Connection, case_sensitive: bool) -> bool {
        if !languages_equal(&self.lang1, &other.lang1) || !languages_equal(&self.lang2, &other.lang2) {
            return false;
        }

        if case_sensitive {
            self.word1 == other.word1 && self.word2 == other.word2
        } else {
            self.word1.to_lowercase() == other.word1.to_lowercase()
                && self.word2.to_lowercase() == other.word2.to_lowercase()
        }
    }

    pub fn lang1(&self) -> &str {
        &self.lang1
    }

    pub fn lang2(&self) -> &str {
        &self.lang2
    }

    pub fn word1(&self) -> &str {
        &self.word1
    }

    pub fn word2(&self) -> &str {
        &self.word2
    }

    pub fn proficiency(&self) -> u8 {
        self.proficiency
    }

    pub fn set_proficiency(&mut self, proficiency: u8) {
        self.proficiency = proficiency.min(MAX_PROFICIENCY);
    }

    pub fn last_quizzed(&self) -> DateTime<Utc> {
        self.last_quizzed
    }

    pub fn set_last_quizzed(&mut self, when: DateTime<Utc>) {
        self.last_quizzed = when;
    }

    /// False for placeholders that never received data.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn store_in_correct_order(&mut self, lang1: &str, lang2: &str, word1: &str, word2: &str) {
        if compare_ignore_case(lang1, lang2) == Ordering::Less {
            self.lang1 = lang1.to_string();
            self.lang2 = lang2.to_string();
            self.word1 = word1.to_string();
            self.word2 = word2.to_string();
        } else {
            self.lang1 = lang2.to_string();
            self.lang2 = lang1.to_string();
            self.word1 = word2.to_string();
            self.word2 = word1.to_string();
        }
    }
}

fn parse_proficiency(raw: &str) -> Result<u8> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| QuizError::ParseFailure(format!("proficiency '{}' is not an integer", raw)))?;

    u8::try_from(value)
        .ok()
        .filter(|p| *p <= MAX_PROFICIENCY)
        .ok_or_else(|| QuizError::ParseFailure(format!("proficiency {} is outside 0-100", value)))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| QuizError::ParseFailure(format!("timestamp '{}' is not an integer", raw)))?;

    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| QuizError::ParseFailure(format!("timestamp {} is out of range", secs)))
}
