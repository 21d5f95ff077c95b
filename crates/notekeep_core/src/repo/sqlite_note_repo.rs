//! SQLite-backed note repository.
//!
//! # Responsibility
//! - Persist notes as four-column rows `{id, title, content, user_id}`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Unset title/content are stored as `NULL`, set values as text, so the
//!   empty-vs-set distinction survives a store/reload cycle.
//! - Read paths reject malformed IDs instead of masking them.

use crate::db::{table_exists, table_has_column, SharedConnection};
use crate::model::note::{Content, Note, NoteId, Title};
use crate::model::user::UserId;
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use rusqlite::{ffi, params, Connection, Row};
use std::sync::MutexGuard;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    user_id
FROM notes";

const NOTE_COLUMNS: [&str; 4] = ["id", "title", "content", "user_id"];

/// SQLite-backed note repository.
pub struct SqliteNoteRepository {
    conn: SharedConnection,
}

impl SqliteNoteRepository {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the `notes` table or one of its columns is missing.
    pub fn try_new(conn: SharedConnection) -> RepoResult<Self> {
        {
            let guard = conn.lock().map_err(|_| RepoError::LockPoisoned)?;
            ensure_notes_table_ready(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn create(&self, note: &Note) -> RepoResult<()> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO notes (id, title, content, user_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                note.id.to_string(),
                note.title.get(),
                note.content.get(),
                note.user_id.to_string(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(RepoError::DuplicateId(note.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return parse_note_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE user_id = ?1;"))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        let changed = self.lock()?.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                user_id = ?4
             WHERE id = ?1;",
            params![
                note.id.to_string(),
                note.title.get(),
                note.content.get(),
                note.user_id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .lock()?
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id = parse_uuid(row.get("id")?, "notes.id")?;
    let user_id = parse_uuid(row.get("user_id")?, "notes.user_id")?;
    Ok(Note::with_id(
        id,
        Title::from(row.get::<_, Option<String>>("title")?),
        Content::from(row.get::<_, Option<String>>("content")?),
        user_id,
    ))
}

fn parse_uuid(value: String, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn ensure_notes_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}
