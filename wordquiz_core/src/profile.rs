//! User profiles: a name plus one master list per language pair
//!
//! File format:
//! ```text
//! <username>
//! <full name>
//! ---
//! <lang1>\t<lang2>\t<home lang>
//! <connection line>
//! ...
//! ---
//! ...
//! ```
//! Loading is tolerant. A bad language pair line drops its section, a bad
//! connection line drops only itself, and a repeated language pair is
//! discarded in favour of the first one.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::iter::Peekable;
use std::path::Path;

use crate::connection::Connection;
use crate::error::{QuizError, Result};
use crate::language_pair::{has_line_break, LanguagePair};
use crate::master_list::{LoadReport, MasterList, SkippedLine};

const SECTION_MARKER: &str = "---";

fn list_name(languages: &LanguagePair) -> String {
    format!("{} / {}", languages.lang1(), languages.lang2())
}

fn check_name_line(what: &str, name: &str) -> Result<()> {
    if has_line_break(name) {
        return Err(QuizError::ParseFailure(format!(
            "{} '{}' contains a line break",
            what,
            name.escape_debug()
        )));
    }
    Ok(())
}

fn is_marker(line: &str) -> bool {
    line.trim_end_matches('\r') == SECTION_MARKER
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    username: String,
    full_name: String,
    lists: HashMap<LanguagePair, MasterList>,
}

impl UserProfile {
    /// Both names are written on a line of their own; the username must not be empty.
    pub fn new(username: &str, full_name: &str) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(QuizError::InvalidUsername(username.to_string()));
        }
        check_name_line("username", username)?;
        check_name_line("full name", full_name)?;

        Ok(UserProfile {
            username: username.to_string(),
            full_name: full_name.to_string(),
            lists: HashMap::new(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn set_full_name(&mut self, full_name: &str) -> Result<()> {
        check_name_line("full name", full_name)?;
        self.full_name = full_name.to_string();
        Ok(())
    }

    pub fn master_list(&self, languages: &LanguagePair) -> Option<&MasterList> {
        self.lists.get(languages)
    }

    pub fn master_list_mut(&mut self, languages: &LanguagePair) -> Option<&mut MasterList> {
        self.lists.get_mut(languages)
    }

    /// Stores `list` under `languages`, returning the list it replaced.
    pub fn insert_master_list(&mut self, languages: LanguagePair, list: MasterList) -> Result<Option<MasterList>> {
        if !languages.is_valid() {
            return Err(QuizError::InvalidLanguage);
        }
        if !list.is_for(&languages) {
            return Err(QuizError::LanguageMismatch {
                lang1: languages.lang1().to_string(),
                lang2: languages.lang2().to_string(),
                found_lang1: list.list().lang1().to_string(),
                found_lang2: list.list().lang2().to_string(),
            });
        }
        // HashMap::insert keeps the old key, which would keep a stale home language
        let replaced = self.lists.remove(&languages);
        self.lists.insert(languages, list);
        Ok(replaced)
    }

    /// The list for `languages`, created empty if the profile lacks one.
    pub fn add_language_pair(&mut self, languages: LanguagePair) -> Result<&mut MasterList> {
        if !languages.is_valid() {
            return Err(QuizError::InvalidLanguage);
        }
        let name = list_name(&languages);
        Ok(match self.lists.entry(languages) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let list = MasterList::for_languages(&name, entry.key())?;
                entry.insert(list)
            }
        })
    }

    pub fn remove_language_pair(&mut self, languages: &LanguagePair) -> Option<MasterList> {
        self.lists.remove(languages)
    }

    /// Language pairs in canonical order.
    pub fn pairs(&self) -> Vec<&LanguagePair> {
        let mut pairs: Vec<&LanguagePair> = self.lists.keys().collect();
        pairs.sort_by_key(|p| (p.lang1().to_lowercase(), p.lang2().to_lowercase()));
        pairs
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<(Self, LoadReport)> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| QuizError::load_failure(path, e.to_string()))?;

        let (profile, report) = Self::parse(&text).map_err(|err| match err {
            QuizError::ParseFailure(reason) => QuizError::load_failure(path, reason),
            other => other,
        })?;

        if !report.is_clean() {
            log::warn!(
                "Profile {:?} loaded with {} skipped line(s)",
                path,
                report.skipped.len()
            );
        }
        log::info!(
            "Loaded profile '{}' with {} language pair(s) from {:?}",
            profile.username,
            profile.len(),
            path
        );
        Ok((profile, report))
    }

    /// Reads a profile from text. Only a missing username or full name fails.
    pub fn parse(text: &str) -> Result<(Self, LoadReport)> {
        let mut lines = text.lines().enumerate().peekable();

        let username = match lines.next() {
            Some((_, name)) if !name.trim().is_empty() => name.trim_end_matches('\r'),
            _ => return Err(QuizError::ParseFailure("missing username".to_string())),
        };
        let full_name = match lines.next() {
            Some((_, name)) => name.trim_end_matches('\r'),
            None => return Err(QuizError::ParseFailure("missing full name".to_string())),
        };

        let mut profile = UserProfile::new(username, full_name)?;
        let mut report = LoadReport::default();

        while let Some((_, line)) = lines.next() {
            if !is_marker(line) {
                continue;
            }

            let (index, pair_line) = match lines.peek() {
                Some(&(_, next)) if is_marker(next) => continue,
                Some(&entry) => entry,
                None => break,
            };
            lines.next();
            let line_number = index + 1;

            if pair_line.trim().is_empty() {
                continue;
            }

            // Unread connection lines are skipped by the scan for the next marker
            let (languages, swapped) = match LanguagePair::load_from_line(pair_line) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::warn!("Skipping section at line {}: {}", line_number, err);
                    report.skip(line_number, &err);
                    continue;
                }
            };

            if profile.lists.contains_key(&languages) {
                log::warn!(
                    "Discarding duplicate <{}, {}> section at line {}",
                    languages.lang1(),
                    languages.lang2(),
                    line_number
                );
                report.skipped.push(SkippedLine {
                    line: line_number,
                    reason: format!(
                        "duplicate language pair <{}, {}>",
                        languages.lang1(),
                        languages.lang2()
                    ),
                });
                continue;
            }

            let list = read_section(&mut lines, &languages, swapped, &mut report)?;
            profile.lists.insert(languages, list);
        }

        Ok((profile, report))
    }

    /// Writes the profile with sections sorted by language pair.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", self.username)?;
        writeln!(writer, "{}", self.full_name)?;

        for languages in self.pairs() {
            writeln!(writer, "{}", SECTION_MARKER)?;
            writeln!(writer, "{}", languages.export_to_line()?)?;
            if let Some(list) = self.lists.get(languages) {
                for conn in list.list() {
                    writeln!(writer, "{}", conn.export_to_line())?;
                }
            }
        }
        writer.flush()?;

        log::debug!("Saved profile '{}' to {:?}", self.username, path.as_ref());
        Ok(())
    }
}

/// Reads connection lines up to a blank line, a section marker or the end.
/// The marker itself is left for the caller.
fn read_section<'t, I>(
    lines: &mut Peekable<I>,
    languages: &LanguagePair,
    swapped: bool,
    report: &mut LoadReport,
) -> Result<MasterList>
where
    I: Iterator<Item = (usize, &'t str)>,
{
    // Connection lines follow the order the pair line was written in
    let (lang_a, lang_b) = if swapped {
        (languages.lang2(), languages.lang1())
    } else {
        (languages.lang1(), languages.lang2())
    };

    let mut list = MasterList::for_languages(&list_name(languages), languages)?;

    while let Some(&(index, line)) = lines.peek() {
        if is_marker(line) {
            break;
        }
        lines.next();
        if line.trim().is_empty() {
            break;
        }

        let line_number = index + 1;
        match Connection::load_from_line(line, lang_a, lang_b).and_then(|conn| list.push(conn)) {
            Ok(()) => report.loaded += 1,
            Err(err) => {
                log::warn!("Skipping connection at line {}: {}", line_number, err);
                report.skip(line_number, &err);
            }
        }
    }

    Ok(list)
}
