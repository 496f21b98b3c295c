//! The durable word list for one language pair
//!
//! File format:
//! ```text
//! <list name>
//! <lang1>\t<lang2>
//! <word1>\t<word2>[\t<proficiency>[\t<last quizzed>]]
//! ...
//! ```
//! Two loaders read it. `import_from_file` is strict and aborts on the first
//! malformed line. `load_from_file` is tolerant: it skips bad lines and
//! reports them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::connection::Connection;
use crate::error::{QuizError, Result};
use crate::language_pair::{languages_equal, tab_fields, LanguagePair};
use crate::quiz_list::{QuizList, QuizSource};
use crate::spreadsheet;

/// A line skipped by a tolerant load.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the source file
    pub line: usize,
    pub reason: String,
}

/// What a tolerant load kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub(crate) fn skip(&mut self, line: usize, err: &QuizError) {
        self.skipped.push(SkippedLine {
            line,
            reason: err.to_string(),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LinePolicy {
    Strict,
    Tolerant,
}

#[derive(Debug, Clone)]
pub struct MasterList {
    list: QuizList,
}

impl MasterList {
    pub fn new(list_name: &str, lang1: &str, lang2: &str) -> Result<Self> {
        Ok(MasterList {
            list: QuizList::new(list_name, lang1, lang2)?,
        })
    }

    /// Fails with `InvalidLanguage` for a default (invalid) pair.
    pub fn for_languages(list_name: &str, languages: &LanguagePair) -> Result<Self> {
        Ok(MasterList {
            list: QuizList::for_languages(list_name, languages)?,
        })
    }

    pub fn list(&self) -> &QuizList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut QuizList {
        &mut self.list
    }

    pub fn into_list(self) -> QuizList {
        self.list
    }

    pub fn name(&self) -> &str {
        self.list.list_name()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn push(&mut self, conn: Connection) -> Result<()> {
        self.list.push(conn)
    }

    /// Whether this list holds words for `languages` (home language ignored).
    pub fn is_for(&self, languages: &LanguagePair) -> bool {
        languages.matches(self.list.lang1(), self.list.lang2())
    }

    /// Strict import: any malformed line fails the whole load.
    pub fn import_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_list_file(path)?;
        let (master, _) = Self::parse(&text, path, LinePolicy::Strict)?;
        log::info!("Imported {} words into '{}' from {:?}", master.len(), master.name(), path);
        Ok(master)
    }

    /// Tolerant load: malformed word lines are skipped and listed in the report.
    /// A missing file or a bad header still fails.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<(Self, LoadReport)> {
        let path = path.as_ref();
        let text = read_list_file(path)?;
        let (master, report) = Self::parse(&text, path, LinePolicy::Tolerant)?;
        if !report.is_clean() {
            log::warn!(
                "Skipped {} malformed line(s) while loading {:?}",
                report.skipped.len(),
                path
            );
        }
        Ok((master, report))
    }

    /// Strict import of a two-column CSV file with a language header row.
    pub fn import_from_csv(path: impl AsRef<Path>) -> Result<Self> {
        spreadsheet::import_csv(path.as_ref())
    }

    /// Strict import of the first worksheet of an Excel or OpenDocument file.
    pub fn import_from_spreadsheet(path: impl AsRef<Path>) -> Result<Self> {
        spreadsheet::import_spreadsheet(path.as_ref())
    }

    /// Strict import that picks a reader from the file extension:
    /// `.csv`, spreadsheet formats, or the tab-separated list format.
    pub fn import_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Self::import_from_csv(path),
            "xlsx" | "xls" | "xlsm" | "ods" => Self::import_from_spreadsheet(path),
            _ => Self::import_from_file(path),
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", self.list.list_name())?;
        writeln!(writer, "{}\t{}", self.list.lang1(), self.list.lang2())?;
        for conn in self.list.iter() {
            writeln!(writer, "{}", conn.export_to_line())?;
        }
        writer.flush()?;

        log::debug!("Saved '{}' ({} words) to {:?}", self.name(), self.len(), path.as_ref());
        Ok(())
    }

    fn parse(text: &str, path: &Path, policy: LinePolicy) -> Result<(Self, LoadReport)> {
        let mut lines = text.lines().enumerate();

        let list_name = match lines.next() {
            Some((_, name)) => name.trim_end_matches('\r'),
            None => return Err(QuizError::load_failure(path, "missing list name")),
        };

        let header = match lines.next() {
            Some((_, header)) => header,
            None => return Err(QuizError::load_failure(path, "missing language header")),
        };
        let languages = tab_fields(header);
        if languages.len() < 2 {
            return Err(QuizError::load_failure(path, "language header needs two languages"));
        }
        let (lang_a, lang_b) = (languages[0], languages[1]);
        if languages_equal(lang_a, lang_b) {
            return Err(QuizError::InvalidLanguage);
        }

        let mut master = MasterList::new(list_name, lang_a, lang_b)?;
        let mut report = LoadReport::default();

        for (index, line) in lines {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            match Connection::load_from_line(line, lang_a, lang_b) {
                Ok(conn) => {
                    master.push(conn)?;
                    report.loaded += 1;
                }
                Err(err) => match policy {
                    LinePolicy::Strict => {
                        return Err(QuizError::MalformedLine {
                            line: line_number,
                            reason: err.to_string(),
                        })
                    }
                    LinePolicy::Tolerant => {
                        log::warn!("{:?} line {}: {}", path, line_number, err);
                        report.skip(line_number, &err);
                    }
                },
            }
        }

        Ok((master, report))
    }
}

fn read_list_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| QuizError::load_failure(path, e.to_string()))
}

impl QuizSource for MasterList {
    fn languages(&self) -> (&str, &str) {
        self.list.languages()
    }

    fn connections(&self) -> &[Connection] {
        self.list.connections()
    }

    fn draw_next(&mut self) -> Option<&Connection> {
        self.list.draw_next()
    }

    fn rewind(&mut self) {
        self.list.rewind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASIC_GERMAN: &str = "Basic German\nEnglish\tGerman\nhello\thallo\ngoodbye\tauf wiedersehen\n";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_basic_german() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "german.txt", BASIC_GERMAN);

        let master = MasterList::import_from_file(&path).unwrap();
        assert_eq!(master.name(), "Basic German");
        assert_eq!(master.list().lang1(), "English");
        assert_eq!(master.list().lang2(), "German");
        assert_eq!(master.len(), 2);
        assert_eq!(master.connections()[1].word2(), "auf wiedersehen");
    }

    #[test]
    fn test_import_rejects_equal_languages() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.txt", "Broken\nEnglish\tEnglish\nhello\thello\n");

        assert!(matches!(
            MasterList::import_from_file(&path),
            Err(QuizError::InvalidLanguage)
        ));
        assert!(matches!(
            MasterList::load_from_file(&path),
            Err(QuizError::InvalidLanguage)
        ));
    }

    #[test]
    fn test_missing_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(
            MasterList::import_from_file(&path),
            Err(QuizError::LoadFileFailure { .. })
        ));
        assert!(matches!(
            MasterList::load_from_file(&path),
            Err(QuizError::LoadFileFailure { .. })
        ));
    }

    #[test]
    fn test_missing_header_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "short.txt", "Only a name\n");
        assert!(matches!(
            MasterList::import_from_file(&path),
            Err(QuizError::LoadFileFailure { .. })
        ));
    }

    #[test]
    fn test_strict_and_tolerant_policies() {
        let dir = TempDir::new().unwrap();
        let contents = "Mixed\nEnglish\tGerman\nhello\thallo\nbroken\nyes\tja\t40\ngood\tgut\tbad\n";
        let path = write_file(&dir, "mixed.txt", contents);

        match MasterList::import_from_file(&path) {
            Err(QuizError::MalformedLine { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected MalformedLine, got {:?}", other),
        }

        let (master, report) = MasterList::load_from_file(&path).unwrap();
        assert_eq!(master.len(), 2);
        assert_eq!(report.loaded, 2);
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(skipped, vec![4, 6]);
    }

    #[test]
    fn test_words_follow_declared_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "rev.txt", "Reversed\nGerman\tEnglish\nHund\tdog\n");

        let master = MasterList::import_from_file(&path).unwrap();
        assert_eq!(master.list().lang1(), "English");
        let conn = &master.connections()[0];
        assert_eq!(conn.word1(), "dog");
        assert_eq!(conn.word2(), "Hund");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut master = MasterList::new("Colours", "French", "English").unwrap();
        master.list_mut().add_words("red", "rouge").unwrap();
        master.list_mut().add_words("blue", "bleu").unwrap();
        master.list_mut().get_mut(1).unwrap().set_proficiency(90);

        let path = dir.path().join("colours.txt");
        master.save_to_file(&path).unwrap();

        let (loaded, report) = MasterList::load_from_file(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(loaded.name(), "Colours");
        assert_eq!(loaded.connections(), master.connections());
        assert_eq!(loaded.connections()[1].proficiency(), 90);
    }

    #[test]
    fn test_for_languages_needs_a_valid_pair() {
        assert!(matches!(
            MasterList::for_languages("Nothing", &LanguagePair::default()),
            Err(QuizError::InvalidLanguage)
        ));
    }

    #[test]
    fn test_save_then_load_keeps_every_word() {
        let dir = TempDir::new().unwrap();
        let mut master = MasterList::new("Phrases", "English", "German").unwrap();
        master.list_mut().add_words("good night", "gute Nacht").unwrap();
        master.list_mut().add_words("---", "Strich").unwrap();
        assert!(master.list_mut().add_words("", "leer").is_err());
        assert!(master.list_mut().add_words("two\twords", "zwei").is_err());

        let path = dir.path().join("phrases.txt");
        master.save_to_file(&path).unwrap();

        let (loaded, report) = MasterList::load_from_file(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(loaded.connections(), master.connections());
        assert_eq!(MasterList::import_from_file(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_import_from_path_uses_text_format_by_default() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "german.list", BASIC_GERMAN);
        let master = MasterList::import_from_path(&path).unwrap();
        assert_eq!(master.len(), 2);
    }
}
