//! Notes use-case service.
//!
//! # Responsibility
//! - Validate ownership on create through `UserLookup`.
//! - Apply partial-update merge rules before persisting.
//! - Wrap repository failures with the failing operation and identifier.
//!
//! # Invariants
//! - Only the unset state of a patch field means "keep current". A field
//!   set to `""` overwrites.
//! - Ownership never changes through `update`.
//! - A rejected create performs no repository write.
//! - No retries: the first repository failure is returned.

use crate::error::ErrorKind;
use crate::model::note::{Note, NoteId, UpdateNote};
use crate::model::user::UserId;
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::repo::user_repo::{UserLookup, UserStoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NotesServiceError {
    /// Create referenced a user that does not exist.
    InvalidOwner(UserId),
    /// User lookup itself failed.
    UserLookup {
        user_id: UserId,
        source: UserStoreError,
    },
    CreateFailed {
        note_id: NoteId,
        source: RepoError,
    },
    UpdateFailed {
        note_id: NoteId,
        source: RepoError,
    },
    DeleteFailed {
        note_id: NoteId,
        source: RepoError,
    },
    QueryByIdFailed {
        note_id: NoteId,
        source: RepoError,
    },
    /// Listing referenced a user that does not exist.
    UnknownUser(UserId),
    QueryByUserFailed {
        user_id: UserId,
        source: RepoError,
    },
}

impl NotesServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOwner(_) => ErrorKind::InvalidOwner,
            Self::UnknownUser(_) => ErrorKind::NotFound,
            Self::UserLookup { source, .. } => source.kind(),
            Self::CreateFailed { source, .. }
            | Self::UpdateFailed { source, .. }
            | Self::DeleteFailed { source, .. }
            | Self::QueryByIdFailed { source, .. }
            | Self::QueryByUserFailed { source, .. } => source.kind(),
        }
    }
}

impl Display for NotesServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOwner(user_id) => write!(f, "create: invalid owner [{user_id}]"),
            Self::UserLookup { user_id, source } => {
                write!(f, "user lookup [{user_id}]: {source}")
            }
            Self::CreateFailed { note_id, source } => write!(f, "create: [{note_id}]: {source}"),
            Self::UpdateFailed { source, .. } => write!(f, "update: {source}"),
            Self::DeleteFailed { note_id, .. } => write!(f, "delete: [{note_id}]"),
            Self::QueryByIdFailed { note_id, source } => {
                write!(f, "getNoteByID: [{note_id}]: {source}")
            }
            Self::UnknownUser(user_id) => {
                write!(f, "getNoteByUserID: [{user_id}]: user not found")
            }
            Self::QueryByUserFailed { user_id, source } => {
                write!(f, "getNoteByUserID: [{user_id}]: {source}")
            }
        }
    }
}

impl Error for NotesServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOwner(_) | Self::UnknownUser(_) => None,
            Self::UserLookup { source, .. } => Some(source),
            Self::CreateFailed { source, .. }
            | Self::UpdateFailed { source, .. }
            | Self::DeleteFailed { source, .. }
            | Self::QueryByIdFailed { source, .. }
            | Self::QueryByUserFailed { source, .. } => Some(source),
        }
    }
}

/// Note service facade over a note repository and a user lookup.
pub struct NotesService<R: NoteRepository, U: UserLookup> {
    notes: R,
    users: U,
}

impl<R: NoteRepository, U: UserLookup> NotesService<R, U> {
    pub fn new(notes: R, users: U) -> Self {
        Self { notes, users }
    }

    /// Creates one note owned by `update.user_id`.
    ///
    /// # Errors
    /// - `InvalidOwner` when the user is unknown; nothing is persisted.
    /// - `CreateFailed` wrapping the repository error.
    pub fn create(&self, update: UpdateNote) -> Result<Note, NotesServiceError> {
        let user_id = update.user_id;
        if !self.user_exists(user_id)? {
            warn!("event=note_create module=service status=rejected reason=invalid_owner user_id={user_id}");
            return Err(NotesServiceError::InvalidOwner(user_id));
        }

        let note = Note::new(update.title, update.content, user_id);
        self.notes
            .create(&note)
            .map_err(|source| NotesServiceError::CreateFailed {
                note_id: note.id,
                source,
            })?;

        info!(
            "event=note_create module=service status=ok note_id={} user_id={user_id}",
            note.id
        );
        Ok(note)
    }

    /// Merges `patch` into `current`, persists and returns the merged note.
    ///
    /// `patch.user_id` is ignored.
    pub fn update(&self, current: Note, patch: UpdateNote) -> Result<Note, NotesServiceError> {
        let merged = merge_note(current, patch);
        self.notes
            .update(&merged)
            .map_err(|source| NotesServiceError::UpdateFailed {
                note_id: merged.id,
                source,
            })?;

        info!(
            "event=note_update module=service status=ok note_id={}",
            merged.id
        );
        Ok(merged)
    }

    pub fn delete(&self, note_id: NoteId) -> Result<(), NotesServiceError> {
        self.notes
            .delete(note_id)
            .map_err(|source| NotesServiceError::DeleteFailed { note_id, source })?;

        info!("event=note_delete module=service status=ok note_id={note_id}");
        Ok(())
    }

    pub fn query_by_id(&self, note_id: NoteId) -> Result<Note, NotesServiceError> {
        let note = self
            .notes
            .get_by_id(note_id)
            .map_err(|source| NotesServiceError::QueryByIdFailed { note_id, source })?;

        debug!("event=note_get module=service status=ok note_id={note_id}");
        Ok(note)
    }

    /// Lists every note owned by `user_id`, in no particular order.
    ///
    /// # Errors
    /// - `UnknownUser` when the user does not exist.
    /// - `QueryByUserFailed` wrapping the repository error.
    ///
    /// A known user without notes yields an empty vector.
    pub fn get_notes_by_user_id(&self, user_id: UserId) -> Result<Vec<Note>, NotesServiceError> {
        if !self.user_exists(user_id)? {
            return Err(NotesServiceError::UnknownUser(user_id));
        }

        let notes = self
            .notes
            .get_by_user_id(user_id)
            .map_err(|source| NotesServiceError::QueryByUserFailed { user_id, source })?;

        debug!(
            "event=note_list module=service status=ok user_id={user_id} count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn user_exists(&self, user_id: UserId) -> Result<bool, NotesServiceError> {
        self.users
            .query_by_id(user_id)
            .map(|user| user.is_some())
            .map_err(|source| NotesServiceError::UserLookup { user_id, source })
    }
}

/// Applies the set fields of `patch` onto `current`.
///
/// Rules, per field independently:
/// - unset patch field: keep `current`'s value.
/// - set patch field (including `""`): replace.
///
/// `id` and `user_id` always come from `current`.
pub fn merge_note(current: Note, patch: UpdateNote) -> Note {
    let mut merged = current;
    if !patch.title.is_empty() {
        merged.title = patch.title;
    }
    if !patch.content.is_empty() {
        merged.content = patch.content;
    }
    merged
}
