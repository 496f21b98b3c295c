//! Word list import from CSV and spreadsheet files
//!
//! The header row names the two languages; every following row is a word
//! pair in that order. Both readers are strict: a row with a single word
//! fails the import. Rows that are completely empty are skipped.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;

use crate::connection::Connection;
use crate::error::{QuizError, Result};
use crate::language_pair::languages_equal;
use crate::master_list::MasterList;

/// Builds a master list from a header pair and word rows.
/// Row numbers are 1-based and count the header.
fn build_list(list_name: &str, path: &Path, headers: &[String], rows: Vec<Vec<String>>) -> Result<MasterList> {
    let languages: Vec<&str> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    if languages.len() < 2 {
        return Err(QuizError::load_failure(path, "header row needs two language names"));
    }
    let (lang_a, lang_b) = (languages[0], languages[1]);
    if languages_equal(lang_a, lang_b) {
        return Err(QuizError::InvalidLanguage);
    }

    let mut master = MasterList::new(list_name, lang_a, lang_b)?;

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 2;
        let words: Vec<&str> = row.iter().map(|cell| cell.trim()).collect();
        let word_a = words.first().copied().unwrap_or_default();
        let word_b = words.get(1).copied().unwrap_or_default();

        if word_a.is_empty() && word_b.is_empty() {
            continue;
        }
        if word_a.is_empty() || word_b.is_empty() {
            return Err(QuizError::MalformedLine {
                line: row_number,
                reason: "row needs a word in both languages".to_string(),
            });
        }

        master.push(Connection::new(lang_a, lang_b, word_a, word_b)?)?;
    }

    log::info!("Imported {} words into '{}' from {:?}", master.len(), list_name, path);
    Ok(master)
}

/// Parse a CSV word list. The list is named after the file stem.
pub fn import_csv(path: &Path) -> Result<MasterList> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| QuizError::load_failure(path, e.to_string()))?;

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let list_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Imported list");

    build_list(list_name, path, &headers, rows)
}

/// Parse the first worksheet of an Excel or OpenDocument file.
/// The list is named after the sheet.
pub fn import_spreadsheet(path: &Path) -> Result<MasterList> {
    let mut workbook = open_workbook_auto(path).map_err(|e| QuizError::load_failure(path, e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| QuizError::load_failure(path, "no sheets found"))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| QuizError::load_failure(path, "empty sheet - no header row"))?
        .iter()
        .map(get_cell_string)
        .collect();

    let body = rows.map(|row| row.iter().map(get_cell_string).collect()).collect();

    build_list(&sheet_name, path, &headers, body)
}

/// Helper to extract string from a spreadsheet cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}
