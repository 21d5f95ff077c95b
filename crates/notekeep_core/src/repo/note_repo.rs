//! Note repository contract shared by every storage backend.
//!
//! # Responsibility
//! - Define CRUD semantics that in-memory and SQLite backends honor
//!   identically.
//! - Report semantic failures (`NotFound`, `DuplicateId`) separately from
//!   transport errors.
//!
//! # Invariants
//! - `create` never overwrites: an existing ID yields `DuplicateId`.
//! - `update` replaces the stored note wholesale; no merge happens here.
//! - `get_by_user_id` returns matches in unspecified order and an empty
//!   vector when nothing matches. User existence is checked upstream.

use crate::db::DbError;
use crate::error::ErrorKind;
use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound(NoteId),
    DuplicateId(NoteId),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A writer panicked while holding the store lock.
    LockPoisoned,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::LockPoisoned => ErrorKind::Persistence,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note already exists: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::LockPoisoned => write!(f, "note store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository: Send + Sync {
    /// Stores a new note. Fails with `DuplicateId` when the ID is taken.
    fn create(&self, note: &Note) -> RepoResult<()>;
    /// Loads one note. Fails with `NotFound` when absent.
    fn get_by_id(&self, id: NoteId) -> RepoResult<Note>;
    /// Loads every note owned by `user_id`, in no particular order.
    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>>;
    /// Replaces the stored note with the same ID. Fails with `NotFound`.
    fn update(&self, note: &Note) -> RepoResult<()>;
    /// Removes one note. Fails with `NotFound` when absent.
    fn delete(&self, id: NoteId) -> RepoResult<()>;
}

impl<R: NoteRepository + ?Sized> NoteRepository for Arc<R> {
    fn create(&self, note: &Note) -> RepoResult<()> {
        (**self).create(note)
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        (**self).get_by_id(id)
    }

    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        (**self).get_by_user_id(user_id)
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        (**self).update(note)
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

impl<R: NoteRepository + ?Sized> NoteRepository for Box<R> {
    fn create(&self, note: &Note) -> RepoResult<()> {
        (**self).create(note)
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        (**self).get_by_id(id)
    }

    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        (**self).get_by_user_id(user_id)
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        (**self).update(note)
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        (**self).delete(id)
    }
}
