//! Domain model for notes and their owners.
//!
//! # Responsibility
//! - Define the `Note` aggregate with its `Title`/`Content` value objects.
//! - Define the `User` record that note ownership points at.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Every note references its owner by `UserId`; ownership is checked at
//!   creation time only.

pub mod note;
pub mod user;
