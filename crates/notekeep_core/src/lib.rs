//! Core domain logic for notekeep.
//! This crate is the single source of truth for note and ownership invariants.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, StorageConfig};
pub use error::ErrorKind;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::note::{Content, Note, NoteId, Title, UpdateNote};
pub use model::user::{User, UserId};
pub use repo::memory_note_repo::InMemoryNoteRepository;
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult};
pub use repo::sqlite_note_repo::SqliteNoteRepository;
pub use repo::user_repo::{
    InMemoryUserStore, SqliteUserRepository, UserLookup, UserResult, UserStoreError,
};
pub use service::notes_service::{merge_note, NotesService, NotesServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
