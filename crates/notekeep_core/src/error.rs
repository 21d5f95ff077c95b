//! Error classification shared by repositories and services.
//!
//! Transport adapters map `ErrorKind` to user-visible statuses; the domain
//! layer never builds responses itself.

use std::fmt::{Display, Formatter};

/// Coarse error category exposed by every domain error via `kind()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Note or user ID is absent.
    NotFound,
    /// Create collided with an existing ID.
    DuplicateId,
    /// Referenced owner does not exist.
    InvalidOwner,
    /// Backend-specific I/O or consistency failure.
    Persistence,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DuplicateId => "duplicate_id",
            Self::InvalidOwner => "invalid_owner",
            Self::Persistence => "persistence",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
