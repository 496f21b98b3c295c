//! Ordered word lists for a single language pair
//!
//! A `QuizList` holds connections that all share the list's languages. The
//! order matters: it is the order a sequential quiz walks, and the sort
//! functions rearrange it so words can be presented least known first, etc.

use std::cmp::Ordering;

use crate::connection::Connection;
use crate::error::{QuizError, Result};
use crate::language_pair::{compare_ignore_case, has_line_break, languages_equal, LanguagePair};

/// What a quiz needs from the list it runs over.
pub trait QuizSource {
    /// The list's languages in canonical order.
    fn languages(&self) -> (&str, &str);

    /// All connections, in the list's current order.
    fn connections(&self) -> &[Connection];

    /// Whether any connection matches `probe` under the given case policy.
    fn contains(&self, probe: &Connection, case_sensitive: bool) -> bool {
        self.connections()
            .iter()
            .any(|conn| conn.basic_equals(probe, case_sensitive))
    }

    /// Advances the list's own cursor and returns the connection it passed.
    ///
    /// The cursor is for hosts walking a list by hand (flashcard views,
    /// exports). Quizzes keep their own position and never move it.
    fn draw_next(&mut self) -> Option<&Connection>;

    /// Moves the cursor back to the start.
    fn rewind(&mut self);
}

fn check_list_name(list_name: &str) -> Result<()> {
    if has_line_break(list_name) {
        return Err(QuizError::ParseFailure(format!(
            "list name '{}' contains a line break",
            list_name.escape_debug()
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct QuizList {
    lang1: String,
    lang2: String,
    list_name: String,
    connections: Vec<Connection>,
    cursor: usize,
}

impl QuizList {
    /// Languages may be given in any order; they are stored alphabetically.
    pub fn new(list_name: &str, lang1: &str, lang2: &str) -> Result<Self> {
        let pair = LanguagePair::new(lang1, lang2, 1)?;
        Self::for_languages(list_name, &pair)
    }

    /// Fails with `InvalidLanguage` for a default (invalid) pair.
    pub fn for_languages(list_name: &str, languages: &LanguagePair) -> Result<Self> {
        if !languages.is_valid() {
            return Err(QuizError::InvalidLanguage);
        }
        check_list_name(list_name)?;
        Ok(QuizList {
            lang1: languages.lang1().to_string(),
            lang2: languages.lang2().to_string(),
            list_name: list_name.to_string(),
            connections: Vec::new(),
            cursor: 0,
        })
    }

    pub fn lang1(&self) -> &str {
        &self.lang1
    }

    pub fn lang2(&self) -> &str {
        &self.lang2
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    pub fn set_list_name(&mut self, list_name: &str) -> Result<()> {
        check_list_name(list_name)?;
        self.list_name = list_name.to_string();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }

    /// Appends a connection, rejecting one from another language pair.
    pub fn push(&mut self, conn: Connection) -> Result<()> {
        if !conn.is_valid()
            || !languages_equal(conn.lang1(), &self.lang1)
            || !languages_equal(conn.lang2(), &self.lang2)
        {
            return Err(QuizError::LanguageMismatch {
                lang1: self.lang1.clone(),
                lang2: self.lang2.clone(),
                found_lang1: conn.lang1().to_string(),
                found_lang2: conn.lang2().to_string(),
            });
        }
        self.connections.push(conn);
        Ok(())
    }

    /// Convenience for `push(Connection::new(lang1, lang2, word1, word2))`
    /// using this list's languages.
    pub fn add_words(&mut self, word1: &str, word2: &str) -> Result<()> {
        let conn = Connection::new(&self.lang1, &self.lang2, word1, word2)?;
        self.push(conn)
    }

    /// Removes every connection matching `conn` (words compared ignoring case).
    /// Returns how many were removed.
    pub fn remove(&mut self, conn: &Connection) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| !c.basic_equals(conn, false));
        self.cursor = 0;
        before - self.connections.len()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Connection> {
        self.connections.get_mut(index)
    }

    pub fn sort_by_lang1(&mut self) {
        self.sort_with(|a, b| compare_ignore_case(a.word1(), b.word1()));
    }

    pub fn sort_by_lang2(&mut self) {
        self.sort_with(|a, b| compare_ignore_case(a.word2(), b.word2()));
    }

    /// Ascending proficiency; ties keep their relative order.
    pub fn sort_by_least_known(&mut self) {
        self.sort_with(|a, b| a.proficiency().cmp(&b.proficiency()));
    }

    /// Exactly `sort_by_least_known` followed by a reversal.
    pub fn sort_by_most_known(&mut self) {
        self.sort_by_least_known();
        self.connections.reverse();
    }

    /// Oldest (or never) quizzed first.
    pub fn sort_by_last_quizzed(&mut self) {
        self.sort_with(|a, b| a.last_quizzed().cmp(&b.last_quizzed()));
    }

    /// Exactly `sort_by_last_quizzed` followed by a reversal.
    pub fn sort_by_recently_quizzed(&mut self) {
        self.sort_by_last_quizzed();
        self.connections.reverse();
    }

    fn sort_with<F>(&mut self, compare: F)
    where
        F: FnMut(&Connection, &Connection) -> Ordering,
    {
        self.connections.sort_by(compare);
        self.cursor = 0;
    }
}

impl QuizSource for QuizList {
    fn languages(&self) -> (&str, &str) {
        (&self.lang1, &self.lang2)
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn draw_next(&mut self) -> Option<&Connection> {
        let conn = self.connections.get(self.cursor)?;
        self.cursor += 1;
        Some(conn)
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl<'a> IntoIterator for &'a QuizList {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.connections.iter()
    }
}
