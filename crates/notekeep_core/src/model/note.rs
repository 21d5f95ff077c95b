//! Note aggregate and its text value objects.
//!
//! # Responsibility
//! - Define the canonical `Note` record and the `UpdateNote` patch shape.
//! - Keep the "unset" state of `Title`/`Content` distinct from "set to `""`".
//!
//! # Invariants
//! - `Title::default()` / `Content::default()` report `is_empty() == true`.
//! - `Title::new(s)` / `Content::new(s)` report `is_empty() == false` for
//!   every `s`, including the empty string.
//! - `Note::id` is assigned once at construction and never reassigned.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one note.
pub type NoteId = Uuid;

/// Note title with an explicit unset state.
///
/// Serialized as `null` when unset and as a JSON string otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(Option<String>);

impl Title {
    /// Creates a set title. `Title::new("")` is set, not empty.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// Replaces the payload and marks the title as set.
    pub fn set(&mut self, value: impl Into<String>) {
        self.0 = Some(value.into());
    }

    /// Returns the payload, or `""` when unset.
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Returns the payload only when set.
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns whether the title was never set.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Title {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

/// Note body with an explicit unset state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(Option<String>);

impl Content {
    /// Creates set content. `Content::new("")` is set, not empty.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.0 = Some(value.into());
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Display for Content {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for Content {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

/// Canonical note record.
///
/// Stored exclusively by a repository; services and callers only hold
/// transient copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note ID.
    pub id: NoteId,
    pub title: Title,
    pub content: Content,
    /// Owning user. Immutable through updates.
    pub user_id: UserId,
}

impl Note {
    /// Creates a note with a freshly generated ID.
    pub fn new(title: Title, content: Content, user_id: UserId) -> Self {
        Self::with_id(Uuid::new_v4(), title, content, user_id)
    }

    /// Creates a note with a caller-provided ID.
    ///
    /// Used by seeding and storage read paths where identity already exists.
    pub fn with_id(id: NoteId, title: Title, content: Content, user_id: UserId) -> Self {
        Self {
            id,
            title,
            content,
            user_id,
        }
    }
}

/// Patch request carrying only the fields a caller wants to change.
///
/// Fields left at their default (unset) state mean "keep the current value".
/// Missing JSON fields decode to the unset state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateNote {
    pub title: Title,
    pub content: Content,
    /// Owner for create requests; ignored by updates.
    pub user_id: UserId,
}

impl UpdateNote {
    pub fn new(title: Title, content: Content, user_id: UserId) -> Self {
        Self {
            title,
            content,
            user_id,
        }
    }
}
