//! SQLite schema creation for the note store.

use rusqlite::Connection;

/// Creates the database schema for the note store.
///
/// This function creates all required tables and indexes. It is
/// idempotent - calling it multiple times is safe.
///
/// # Tables Created
/// - `notes` - Note metadata (id, title, timestamps)
/// - `blocks` - Ordered content blocks per note (text or voice)
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            created TEXT NOT NULL,
            modified TEXT NOT NULL
        );",
    )?;

    // seq is the display position; block identity is not persisted
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS blocks (
            note_id TEXT NOT NULL REFERENCES notes(id) ON DELETE CASCADE,
            seq INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('text', 'voice')),
            block_text TEXT,
            voice_path TEXT,
            voice_size INTEGER,
            voice_create_time TEXT,
            voice_title TEXT,
            PRIMARY KEY (note_id, seq)
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_blocks_note ON blocks(note_id);
         CREATE INDEX IF NOT EXISTS idx_notes_modified ON notes(modified);",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
        [],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?",
            [name],
            |_| Ok(()),
        )
        .is_ok()
    }

    #[test]
    fn create_schema_returns_ok() {
        let conn = test_connection();
        assert!(create_schema(&conn).is_ok());
    }

    #[test]
    fn all_tables_created() {
        let conn = test_connection();
        create_schema(&conn).unwrap();
        assert!(table_exists(&conn, "notes"), "notes table should exist");
        assert!(table_exists(&conn, "blocks"), "blocks table should exist");
        assert!(
            table_exists(&conn, "schema_version"),
            "schema_version table should exist"
        );
    }

    #[test]
    fn notes_table_accepts_valid_row() {
        let conn = test_connection();
        create_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO notes (id, title, created, modified) VALUES (?, ?, ?, ?)",
            [
                "01HQ3K5M7NXJK4QZPW8V2R6T9Y",
                "Title",
                "2024-01-15T10:30:00Z",
                "2024-01-15T10:30:00Z",
            ],
        );
        assert!(result.is_ok(), "should accept valid note row");
    }

    #[test]
    fn blocks_table_rejects_unknown_kind() {
        let conn = test_connection();
        create_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO notes (id, title, created, modified) VALUES (?, ?, ?, ?)",
            [
                "01HQ3K5M7NXJK4QZPW8V2R6T9Y",
                "Title",
                "2024-01-15T10:30:00Z",
                "2024-01-15T10:30:00Z",
            ],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO blocks (note_id, seq, kind, block_text) VALUES (?, 0, 'image', 'x')",
            ["01HQ3K5M7NXJK4QZPW8V2R6T9Y"],
        );
        assert!(result.is_err(), "should reject unknown block kind");
    }

    #[test]
    fn blocks_fk_enforced() {
        let conn = test_connection();
        create_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO blocks (note_id, seq, kind, block_text) VALUES (?, 0, 'text', 'x')",
            ["nonexistent"],
        );
        assert!(result.is_err(), "should reject invalid note_id FK");
    }

    #[test]
    fn cascade_delete_note_removes_blocks() {
        let conn = test_connection();
        create_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO notes (id, title, created, modified) VALUES (?, ?, ?, ?)",
            [
                "01HQ3K5M7NXJK4QZPW8V2R6T9Y",
                "Title",
                "2024-01-15T10:30:00Z",
                "2024-01-15T10:30:00Z",
            ],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO blocks (note_id, seq, kind, block_text) VALUES (?, 0, 'text', 'x')",
            ["01HQ3K5M7NXJK4QZPW8V2R6T9Y"],
        )
        .unwrap();

        conn.execute(
            "DELETE FROM notes WHERE id = ?",
            ["01HQ3K5M7NXJK4QZPW8V2R6T9Y"],
        )
        .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "blocks should be empty after cascade delete");
    }

    #[test]
    fn create_schema_is_idempotent() {
        let conn = test_connection();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        assert!(table_exists(&conn, "notes"));
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn create_schema_preserves_existing_data() {
        let conn = test_connection();
        create_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO notes (id, title, created, modified) VALUES (?, ?, ?, ?)",
            [
                "01HQ3K5M7NXJK4QZPW8V2R6T9Y",
                "Title",
                "2024-01-15T10:30:00Z",
                "2024-01-15T10:30:00Z",
            ],
        )
        .unwrap();

        create_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "existing data should be preserved");
    }
}
