//! DbVisitor trait and the note visitors.
//!
//! A visitor encapsulates one logical database operation: it builds the
//! statement batch from current in-memory state, and after execution it
//! materializes result rows back into domain objects. Visitors are
//! ephemeral - one per operation - and never touch the connection lock
//! themselves.

use crate::domain::{BlockKind, NoteBlock, NoteId, NoteItem};
use crate::store::{SqlStatement, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rusqlite::types::Value;
use serde::Serialize;
use std::path::PathBuf;

/// One database operation's statement generation and result materialization.
pub trait DbVisitor {
    /// Builds the ordered statement batch from current entity state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PrepareFailed`] when required fields of the
    /// target entity are unset.
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>>;

    /// Reads result rows back into the target entity.
    ///
    /// Called by the manager after the statement batch, under the same
    /// lock. The default implementation does nothing; only insert and
    /// query visitors override it.
    fn materialize(&mut self, conn: &Connection) -> StoreResult<()> {
        let _ = conn;
        Ok(())
    }
}

// ===========================================
// Row Mapping Helpers
// ===========================================

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::MaterializeFailed(format!("bad timestamp '{raw}': {e}")))
}

/// Builds the upsert statement for one block at a sequence position.
fn block_upsert(note_id: &NoteId, seq: i64, block: &NoteBlock) -> StoreResult<SqlStatement> {
    let sql = "INSERT OR REPLACE INTO blocks \
               (note_id, seq, kind, block_text, voice_path, voice_size, voice_create_time, voice_title) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

    let params = match block.kind() {
        BlockKind::Text => vec![
            Value::Text(note_id.to_string()),
            Value::Integer(seq),
            Value::Text("text".to_string()),
            Value::Text(block.text().unwrap_or_default().to_string()),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
        ],
        BlockKind::Voice => {
            let voice = block.voice().ok_or_else(|| {
                StoreError::PrepareFailed("voice block without metadata".to_string())
            })?;
            if voice.voice_path.as_os_str().is_empty() {
                return Err(StoreError::PrepareFailed(format!(
                    "voice block at position {seq} has no recording path"
                )));
            }
            if voice.voice_title.is_empty() {
                return Err(StoreError::PrepareFailed(format!(
                    "voice block at position {seq} has no title"
                )));
            }
            vec![
                Value::Text(note_id.to_string()),
                Value::Integer(seq),
                Value::Text("voice".to_string()),
                Value::Null,
                Value::Text(voice.voice_path.to_string_lossy().into_owned()),
                Value::Integer(voice.voice_size as i64),
                Value::Text(voice.create_time.to_rfc3339()),
                Value::Text(voice.voice_title.clone()),
            ]
        }
    };

    Ok(SqlStatement::with_params(sql, params))
}

// ===========================================
// Insert Note
// ===========================================

/// Inserts a note row plus its current blocks.
pub struct InsertNoteVisitor<'a> {
    note: &'a NoteItem,
    confirmed: bool,
}

impl<'a> InsertNoteVisitor<'a> {
    pub fn new(note: &'a NoteItem) -> Self {
        Self {
            note,
            confirmed: false,
        }
    }

    /// True once materialization has confirmed the inserted row.
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }
}

impl DbVisitor for InsertNoteVisitor<'_> {
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>> {
        let mut statements = vec![SqlStatement::with_params(
            "INSERT INTO notes (id, title, created, modified) VALUES (?1, ?2, ?3, ?4)",
            vec![
                Value::Text(self.note.id().to_string()),
                Value::Text(self.note.title().to_string()),
                Value::Text(self.note.created().to_rfc3339()),
                Value::Text(self.note.modified().to_rfc3339()),
            ],
        )];

        for (seq, block) in self.note.blocks().iter().enumerate() {
            statements.push(block_upsert(self.note.id(), seq as i64, block)?);
        }

        Ok(statements)
    }

    fn materialize(&mut self, conn: &Connection) -> StoreResult<()> {
        // Read the new record back to confirm the insert landed.
        let found: Result<String, _> = conn.query_row(
            "SELECT id FROM notes WHERE id = ?1",
            [self.note.id().to_string()],
            |row| row.get(0),
        );
        match found {
            Ok(_) => {
                self.confirmed = true;
                Ok(())
            }
            Err(e) => Err(StoreError::MaterializeFailed(format!(
                "inserted note {} not found: {e}",
                self.note.id()
            ))),
        }
    }
}

// ===========================================
// Update Note
// ===========================================

/// Rewrites a note's block sequence and touches its metadata.
///
/// Produces one upsert per block, plus two fixed bookkeeping statements:
/// clearing the old block rows and updating the note row.
pub struct UpdateNoteVisitor<'a> {
    note: &'a NoteItem,
}

impl<'a> UpdateNoteVisitor<'a> {
    pub fn new(note: &'a NoteItem) -> Self {
        Self { note }
    }
}

impl DbVisitor for UpdateNoteVisitor<'_> {
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>> {
        let mut statements = vec![SqlStatement::with_params(
            "DELETE FROM blocks WHERE note_id = ?1",
            vec![Value::Text(self.note.id().to_string())],
        )];

        for (seq, block) in self.note.blocks().iter().enumerate() {
            statements.push(block_upsert(self.note.id(), seq as i64, block)?);
        }

        statements.push(SqlStatement::with_params(
            "UPDATE notes SET title = ?1, modified = ?2 WHERE id = ?3",
            vec![
                Value::Text(self.note.title().to_string()),
                Value::Text(self.note.modified().to_rfc3339()),
                Value::Text(self.note.id().to_string()),
            ],
        ));

        Ok(statements)
    }
}

// ===========================================
// Query Note
// ===========================================

/// Loads one note and its blocks, in sequence order.
pub struct QueryNoteVisitor {
    id: NoteId,
    result: Option<NoteItem>,
}

impl QueryNoteVisitor {
    pub fn new(id: NoteId) -> Self {
        Self { id, result: None }
    }

    /// Consumes the visitor, returning the materialized note.
    pub fn into_note(self) -> Option<NoteItem> {
        self.result
    }
}

impl DbVisitor for QueryNoteVisitor {
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>> {
        // The SELECTs run during materialization, under the same lock.
        Ok(Vec::new())
    }

    fn materialize(&mut self, conn: &Connection) -> StoreResult<()> {
        let row: Result<(String, String, String), _> = conn.query_row(
            "SELECT title, created, modified FROM notes WHERE id = ?1",
            [self.id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        );

        let (title, created, modified) = match row {
            Ok(values) => values,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::NotFound {
                    id: self.id.to_string(),
                });
            }
            Err(e) => return Err(StoreError::MaterializeFailed(e.to_string())),
        };

        let mut note = NoteItem::new(
            self.id.clone(),
            title,
            parse_timestamp(&created)?,
            parse_timestamp(&modified)?,
        )
        .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;

        type BlockRow = (
            String,
            Option<String>,
            Option<String>,
            Option<i64>,
            Option<String>,
            Option<String>,
        );

        let mut stmt = conn
            .prepare(
                "SELECT kind, block_text, voice_path, voice_size, voice_create_time, voice_title \
                 FROM blocks WHERE note_id = ?1 ORDER BY seq",
            )
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;
        let rows: Vec<BlockRow> = stmt
            .query_map([self.id.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;

        for (kind, block_text, voice_path, voice_size, voice_create_time, voice_title) in rows {
            match kind.as_str() {
                "text" => {
                    let mut block = note.new_block(BlockKind::Text);
                    block.set_text(block_text.unwrap_or_default());
                    note.push_block(block)
                        .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;
                }
                "voice" => {
                    let path = voice_path.ok_or_else(|| {
                        StoreError::MaterializeFailed("voice row without path".to_string())
                    })?;
                    let title = voice_title.ok_or_else(|| {
                        StoreError::MaterializeFailed("voice row without title".to_string())
                    })?;
                    let create_time = match voice_create_time {
                        Some(raw) => parse_timestamp(&raw)?,
                        None => Utc::now(),
                    };

                    let mut block = note.new_block(BlockKind::Voice);
                    if let Some(voice) = block.voice_mut() {
                        voice.voice_path = PathBuf::from(path);
                        voice.voice_size = voice_size.unwrap_or(0) as u64;
                        voice.create_time = create_time;
                        voice.voice_title = title;
                    }
                    note.push_block(block)
                        .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;
                }
                other => {
                    return Err(StoreError::MaterializeFailed(format!(
                        "unknown block kind '{other}'"
                    )));
                }
            }
        }

        self.result = Some(note);
        Ok(())
    }
}

// ===========================================
// Query All Notes
// ===========================================

/// One note in a listing, without block payloads.
#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub block_count: usize,
}

/// Loads summaries of every note, oldest first.
pub struct QueryNotesVisitor {
    result: Vec<NoteSummary>,
}

impl QueryNotesVisitor {
    pub fn new() -> Self {
        Self { result: Vec::new() }
    }

    /// Consumes the visitor, returning the materialized summaries.
    pub fn into_summaries(self) -> Vec<NoteSummary> {
        self.result
    }
}

impl Default for QueryNotesVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DbVisitor for QueryNotesVisitor {
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>> {
        Ok(Vec::new())
    }

    fn materialize(&mut self, conn: &Connection) -> StoreResult<()> {
        let mut stmt = conn
            .prepare(
                "SELECT n.id, n.title, n.created, n.modified, COUNT(b.seq) \
                 FROM notes n LEFT JOIN blocks b ON b.note_id = n.id \
                 GROUP BY n.id ORDER BY n.created",
            )
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;

        let rows: Vec<(String, String, String, String, i64)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::MaterializeFailed(e.to_string()))?;

        self.result.clear();
        for (id, title, created, modified, block_count) in rows {
            let id: NoteId = id
                .parse()
                .map_err(|e: crate::domain::ParseNoteIdError| {
                    StoreError::MaterializeFailed(e.to_string())
                })?;
            self.result.push(NoteSummary {
                id,
                title,
                created: parse_timestamp(&created)?,
                modified: parse_timestamp(&modified)?,
                block_count: block_count as usize,
            });
        }

        Ok(())
    }
}

// ===========================================
// Delete Note
// ===========================================

/// Deletes a note row; block rows go with it via the FK cascade.
pub struct DeleteNoteVisitor {
    id: NoteId,
}

impl DeleteNoteVisitor {
    pub fn new(id: NoteId) -> Self {
        Self { id }
    }
}

impl DbVisitor for DeleteNoteVisitor {
    fn prepare_statements(&self) -> StoreResult<Vec<SqlStatement>> {
        Ok(vec![
            SqlStatement::with_params(
                "DELETE FROM blocks WHERE note_id = ?1",
                vec![Value::Text(self.id.to_string())],
            ),
            SqlStatement::with_params(
                "DELETE FROM notes WHERE id = ?1",
                vec![Value::Text(self.id.to_string())],
            ),
        ])
    }
}
