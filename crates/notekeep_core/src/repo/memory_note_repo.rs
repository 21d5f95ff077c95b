//! In-memory note repository.
//!
//! # Invariants
//! - One mutex guards the whole map; every operation holds it for its full
//!   duration, so reads never observe a half-applied write.
//! - Each instance is explicitly owned and injected; there is no global store.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Map-backed note repository for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: Mutex<HashMap<NoteId, Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with `notes`.
    ///
    /// Fails with `DuplicateId` when two seed notes share an ID.
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> RepoResult<Self> {
        let mut map = HashMap::new();
        for note in notes {
            match map.entry(note.id) {
                Entry::Occupied(_) => return Err(RepoError::DuplicateId(note.id)),
                Entry::Vacant(slot) => {
                    slot.insert(note);
                }
            }
        }

        Ok(Self {
            notes: Mutex::new(map),
        })
    }

    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, HashMap<NoteId, Note>>> {
        self.notes.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn create(&self, note: &Note) -> RepoResult<()> {
        match self.lock()?.entry(note.id) {
            Entry::Occupied(_) => Err(RepoError::DuplicateId(note.id)),
            Entry::Vacant(slot) => {
                slot.insert(note.clone());
                Ok(())
            }
        }
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Note> {
        self.lock()?.get(&id).cloned().ok_or(RepoError::NotFound(id))
    }

    fn get_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<Note>> {
        Ok(self
            .lock()?
            .values()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect())
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        match self.lock()?.get_mut(&note.id) {
            Some(stored) => {
                *stored = note.clone();
                Ok(())
            }
            None => Err(RepoError::NotFound(note.id)),
        }
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}
