//! SQLite schema for the attempt log

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS attempts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lang1 TEXT NOT NULL,
    lang2 TEXT NOT NULL,
    word1 TEXT NOT NULL,
    word2 TEXT NOT NULL,
    direction TEXT NOT NULL,
    prompt TEXT NOT NULL,
    answer TEXT NOT NULL,
    expected TEXT NOT NULL,
    is_correct INTEGER NOT NULL,
    attempted_at TEXT NOT NULL
)";

/// Open (creating if needed) the attempt database at `db_path`
pub fn init_database(db_path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(db_path.as_ref())?;
    create_schema(&conn)?;
    log::debug!("Attempt database ready at {:?}", db_path.as_ref());
    Ok(conn)
}

/// A throwaway database, mostly for tests
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(SCHEMA, [])?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS attempts_by_pair ON attempts (lang1, lang2)",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn attempt_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM attempts", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_schema_is_created_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("attempts.sqlite");

        let conn = init_database(&path).unwrap();
        conn.execute(
            "INSERT INTO attempts (lang1, lang2, word1, word2, direction, prompt, answer, expected, is_correct, attempted_at)
             VALUES ('English', 'German', 'dog', 'Hund', 'standard', 'dog', 'Hund', 'Hund', 1, '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        drop(conn);

        let reopened = init_database(&path).unwrap();
        assert_eq!(attempt_count(&reopened), 1);
    }

    #[test]
    fn test_in_memory_starts_empty() {
        let conn = open_in_memory().unwrap();
        assert_eq!(attempt_count(&conn), 0);
    }
}
