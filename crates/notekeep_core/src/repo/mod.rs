//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define storage-agnostic contracts for notes and user lookup.
//! - Provide in-memory and SQLite backends that honor them identically.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to storage transport errors.
//! - Repositories never merge; they store what they are given.

pub mod memory_note_repo;
pub mod note_repo;
pub mod sqlite_note_repo;
pub mod user_repo;
