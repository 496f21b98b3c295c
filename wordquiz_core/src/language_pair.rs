//! Language pairs: the key that identifies a word list
//!
//! Languages are always stored alphabetically (ignoring case), so
//! `<German, English>` and `<english, GERMAN>` name the same list.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::{QuizError, Result};

/// Case-insensitive language equality.
pub(crate) fn languages_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive lexicographic comparison of two names.
pub(crate) fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Whether `text` survives the tab-separated line formats unchanged:
/// non-empty, with no tab or line break.
pub(crate) fn is_storable(text: &str) -> bool {
    !text.is_empty() && !text.contains(['\t', '\r', '\n'])
}

/// Names written on a line of their own (list names, user names) may hold
/// tabs but never a line break.
pub(crate) fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

/// Splits a record on tabs. Empty fields are dropped and a trailing `\r` is ignored.
pub(crate) fn tab_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n'])
        .split('\t')
        .filter(|field| !field.is_empty())
        .collect()
}

fn check_home(which_is_home: i64) -> Result<u8> {
    match which_is_home {
        1 => Ok(1),
        2 => Ok(2),
        other => Err(QuizError::InvalidHomeLanguage(other)),
    }
}

/// Two distinct languages plus which one is the user's home language.
///
/// Equality and hashing ignore case and ignore `home_lang`: two pairs that
/// only differ in which side is home refer to the same word list.
#[derive(Debug, Clone, Default)]
pub struct LanguagePair {
    lang1: String,
    lang2: String,
    home_lang: u8,
    valid: bool,
}

impl LanguagePair {
    /// `which_is_home` refers to the argument order: 1 for `lang_a`, 2 for `lang_b`.
    pub fn new(lang_a: &str, lang_b: &str, which_is_home: i64) -> Result<Self> {
        if !is_storable(lang_a) || !is_storable(lang_b) || languages_equal(lang_a, lang_b) {
            return Err(QuizError::InvalidLanguage);
        }
        let home = check_home(which_is_home)?;

        Ok(Self::canonical(lang_a, lang_b, home).0)
    }

    /// Builds a valid pair in alphabetical order; the flag is true when the
    /// inputs had to be swapped.
    fn canonical(lang_a: &str, lang_b: &str, home: u8) -> (Self, bool) {
        if compare_ignore_case(lang_a, lang_b) == Ordering::Less {
            let pair = LanguagePair {
                lang1: lang_a.to_string(),
                lang2: lang_b.to_string(),
                home_lang: home,
                valid: true,
            };
            (pair, false)
        } else {
            let pair = LanguagePair {
                lang1: lang_b.to_string(),
                lang2: lang_a.to_string(),
                home_lang: if home == 1 { 2 } else { 1 },
                valid: true,
            };
            (pair, true)
        }
    }

    /// Parses `lang1 \t lang2 [\t homeLang]`.
    ///
    /// Returns the pair and whether the line's languages were out of
    /// alphabetical order. Callers reading connection lines written in the
    /// line's order need that flag to map words to the right languages.
    pub fn load_from_line(line: &str) -> Result<(Self, bool)> {
        let fields = tab_fields(line);
        if fields.len() < 2 {
            return Err(QuizError::ParseFailure(format!(
                "expected two languages, found '{}'",
                line.trim_end()
            )));
        }

        let (lang_a, lang_b) = (fields[0], fields[1]);
        if !is_storable(lang_a) || !is_storable(lang_b) || languages_equal(lang_a, lang_b) {
            return Err(QuizError::InvalidLanguage);
        }

        let home = match fields.get(2) {
            Some(raw) => {
                let parsed: i64 = raw.trim().parse().map_err(|_| {
                    QuizError::ParseFailure(format!("home language '{}' is not an integer", raw))
                })?;
                check_home(parsed)?
            }
            None => 1,
        };

        Ok(Self::canonical(lang_a, lang_b, home))
    }

    /// `lang1 \t lang2 \t homeLang`, without a line terminator.
    pub fn export_to_line(&self) -> Result<String> {
        if !self.valid {
            return Err(QuizError::InvalidLanguage);
        }
        Ok(format!("{}\t{}\t{}", self.lang1, self.lang2, self.home_lang))
    }

    pub fn lang1(&self) -> &str {
        &self.lang1
    }

    pub fn lang2(&self) -> &str {
        &self.lang2
    }

    /// 1 if `lang1` is home, 2 if `lang2` is.
    pub fn which_lang_is_home(&self) -> u8 {
        self.home_lang
    }

    pub fn set_home_lang(&mut self, new_home_lang: i64) -> Result<()> {
        if !self.valid {
            return Err(QuizError::InvalidLanguage);
        }
        self.home_lang = check_home(new_home_lang)?;
        Ok(())
    }

    pub fn home_language_name(&self) -> Result<&str> {
        if !self.valid {
            return Err(QuizError::InvalidLanguage);
        }
        Ok(if self.home_lang == 1 { &self.lang1 } else { &self.lang2 })
    }

    pub fn foreign_language_name(&self) -> Result<&str> {
        if !self.valid {
            return Err(QuizError::InvalidLanguage);
        }
        Ok(if self.home_lang == 1 { &self.lang2 } else { &self.lang1 })
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True when `lang1`/`lang2` name this pair's languages in canonical order.
    pub fn matches(&self, lang1: &str, lang2: &str) -> bool {
        languages_equal(&self.lang1, lang1) && languages_equal(&self.lang2, lang2)
    }
}

impl PartialEq for LanguagePair {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.lang1, &other.lang2)
    }
}

impl Eq for LanguagePair {}

impl Hash for LanguagePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lang1.to_lowercase().hash(state);
        self.lang2.to_lowercase().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_canonical_order_is_input_independent() {
        let forward = LanguagePair::new("English", "German", 1).unwrap();
        let backward = LanguagePair::new("German", "English", 2).unwrap();

        assert_eq!(forward.lang1(), "English");
        assert_eq!(forward.lang2(), "German");
        assert_eq!(backward.lang1(), "English");
        assert_eq!(backward.lang2(), "German");
        assert_eq!(forward.which_lang_is_home(), 1);
        assert_eq!(backward.which_lang_is_home(), 1);
    }

    #[test]
    fn test_home_flips_with_swap() {
        let pair = LanguagePair::new("Spanish", "english", 1).unwrap();
        assert_eq!(pair.lang1(), "english");
        assert_eq!(pair.which_lang_is_home(), 2);
        assert_eq!(pair.home_language_name().unwrap(), "Spanish");
        assert_eq!(pair.foreign_language_name().unwrap(), "english");
    }

    #[test]
    fn test_equal_languages_rejected() {
        for (a, b) in [("French", "French"), ("French", "fReNcH"), ("", "")] {
            assert!(matches!(
                LanguagePair::new(a, b, 1),
                Err(QuizError::InvalidLanguage)
            ));
        }
    }

    #[test]
    fn test_home_indicator_must_be_one_or_two() {
        assert!(matches!(
            LanguagePair::new("English", "German", 3),
            Err(QuizError::InvalidHomeLanguage(3))
        ));

        let mut pair = LanguagePair::new("English", "German", 1).unwrap();
        assert!(matches!(
            pair.set_home_lang(0),
            Err(QuizError::InvalidHomeLanguage(0))
        ));
        pair.set_home_lang(2).unwrap();
        assert_eq!(pair.home_language_name().unwrap(), "German");
    }

    #[test]
    fn test_load_from_line_defaults_and_swap() {
        let (pair, swapped) = LanguagePair::load_from_line("English\tGerman").unwrap();
        assert!(!swapped);
        assert_eq!(pair.which_lang_is_home(), 1);

        let (pair, swapped) = LanguagePair::load_from_line("German\tEnglish\t1\r\n").unwrap();
        assert!(swapped);
        assert_eq!(pair.lang1(), "English");
        assert_eq!(pair.which_lang_is_home(), 2);
    }

    #[test]
    fn test_load_from_line_failures() {
        assert!(matches!(
            LanguagePair::load_from_line("English"),
            Err(QuizError::ParseFailure(_))
        ));
        assert!(matches!(
            LanguagePair::load_from_line("English\tenglish"),
            Err(QuizError::InvalidLanguage)
        ));
        assert!(matches!(
            LanguagePair::load_from_line("English\tGerman\thome"),
            Err(QuizError::ParseFailure(_))
        ));
        assert!(matches!(
            LanguagePair::load_from_line("English\tGerman\t3"),
            Err(QuizError::InvalidHomeLanguage(3))
        ));
    }

    #[test]
    fn test_unstorable_names_rejected() {
        for (a, b) in [("", "German"), ("Eng\tlish", "German"), ("English", "Ger\nman"), ("English\r", "German")] {
            assert!(
                matches!(LanguagePair::new(a, b, 1), Err(QuizError::InvalidLanguage)),
                "<{:?}, {:?}> should be rejected",
                a,
                b
            );
        }
        assert!(is_storable("Old Norse"));
    }

    #[test]
    fn test_export_round_trip() {
        let pair = LanguagePair::new("Japanese", "English", 2).unwrap();
        let line = pair.export_to_line().unwrap();
        assert_eq!(line, "English\tJapanese\t1");

        let (loaded, swapped) = LanguagePair::load_from_line(&line).unwrap();
        assert!(!swapped);
        assert_eq!(loaded.lang1(), pair.lang1());
        assert_eq!(loaded.lang2(), pair.lang2());
        assert_eq!(loaded.which_lang_is_home(), pair.which_lang_is_home());
    }

    #[test]
    fn test_invalid_pair_cannot_export() {
        let pair = LanguagePair::default();
        assert!(!pair.is_valid());
        assert!(matches!(pair.export_to_line(), Err(QuizError::InvalidLanguage)));
    }

    #[test]
    fn test_map_key_ignores_case_and_home() {
        let mut lists = HashMap::new();
        lists.insert(LanguagePair::new("English", "German", 1).unwrap(), "list");

        let other_home = LanguagePair::new("german", "ENGLISH", 1).unwrap();
        assert_eq!(other_home.which_lang_is_home(), 2);
        assert_eq!(lists.get(&other_home), Some(&"list"));
    }
}
