//! SQLite-backed note source.
//!
//! # Responsibility
//! - Implement the `NoteSource` contract over canonical `notes` storage.
//! - Keep SQL details inside the source boundary.
//!
//! # Invariants
//! - Connections are bootstrapped (`db::open_db*`) before use, so the
//!   schema is always fully migrated here.
//! - `update_note` reports `NoteNotFound` instead of silently writing zero
//!   rows.

use crate::model::note::{Note, NoteDraft, NoteId, Timestamp};
use crate::model::user::UserId;
use crate::source::notes::NoteSource;
use crate::source::{SourceError, SourceResult};
use rusqlite::{params, Connection, Row};
use std::sync::Mutex;

const NOTE_SELECT_SQL: &str = "SELECT id, user_id, title, content, last_modified FROM notes";

/// Durable note source over a migrated SQLite connection.
///
/// The connection is owned and serialized behind a mutex so the source can
/// be shared as `Arc<dyn NoteSource>` across async tasks.
pub struct SqliteNoteSource {
    conn: Mutex<Connection>,
}

impl SqliteNoteSource {
    /// Wraps a connection previously opened through `db::open_db` or
    /// `db::open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> SourceResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SourceError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl NoteSource for SqliteNoteSource {
    fn notes_for_user(&self, user_id: UserId) -> SourceResult<Vec<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![user_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn create_note(&self, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO notes (user_id, title, content, last_modified)
             VALUES (?1, ?2, ?3, ?4);",
            params![draft.user_id, draft.title, draft.content, stamp],
        )?;

        let id: NoteId = conn.last_insert_rowid();
        Ok(draft.clone().into_note(id, stamp))
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE notes
             SET user_id = ?1, title = ?2, content = ?3, last_modified = ?4
             WHERE id = ?5;",
            params![draft.user_id, draft.title, draft.content, stamp, id],
        )?;

        if changed == 0 {
            return Err(SourceError::NoteNotFound(id));
        }

        Ok(draft.clone().into_note(id, stamp))
    }
}

fn parse_note_row(row: &Row<'_>) -> SourceResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        last_modified: row.get("last_modified")?,
    })
}
