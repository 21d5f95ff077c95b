//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire configuration, logging, storage and `NotesService` together.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Commands: `ping`, `version`, `demo` (default).

use log::info;
use notekeep_core::db::{open_db, shared};
use notekeep_core::{
    init_logging, Content, CoreConfig, InMemoryNoteRepository, InMemoryUserStore, NoteRepository,
    NotesService, SqliteNoteRepository, SqliteUserRepository, StorageConfig, Title, UpdateNote,
    User, UserLookup,
};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let command = std::env::args().nth(1).unwrap_or_else(|| "demo".to_string());
    let outcome = match command.as_str() {
        "ping" => {
            println!("notekeep_core ping={}", notekeep_core::ping());
            Ok(())
        }
        "version" => {
            println!("notekeep_core version={}", notekeep_core::core_version());
            Ok(())
        }
        "demo" => run_demo(),
        other => Err(format!("unknown command `{other}`; expected ping|version|demo").into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level.as_str(), log_dir)?;
    }

    let demo_user = User::new("demo", "demo@example.com");
    let (notes, users) = open_storage(&config.storage, &demo_user)?;
    info!(
        "event=cli_demo module=cli status=start storage={}",
        storage_name(&config.storage)
    );

    let service = NotesService::new(notes, users);
    let created = service.create(UpdateNote::new(
        Title::new("first note"),
        Content::new("written by the notekeep demo"),
        demo_user.id,
    ))?;
    service.update(
        created,
        UpdateNote::new(Title::new("first note (edited)"), Content::default(), demo_user.id),
    )?;

    let listed = service.get_notes_by_user_id(demo_user.id)?;
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}

type Storage = (Box<dyn NoteRepository>, Box<dyn UserLookup>);

/// Builds the configured backend with `seed_user` registered.
fn open_storage(storage: &StorageConfig, seed_user: &User) -> Result<Storage, Box<dyn Error>> {
    match storage {
        StorageConfig::InMemory => {
            let notes: Box<dyn NoteRepository> = Box::new(InMemoryNoteRepository::new());
            let users: Box<dyn UserLookup> =
                Box::new(InMemoryUserStore::new([seed_user.clone()])?);
            Ok((notes, users))
        }
        StorageConfig::Sqlite { path } => {
            let conn = shared(open_db(path)?);
            let user_repo = SqliteUserRepository::try_new(Arc::clone(&conn))?;
            user_repo.create_user(seed_user)?;
            let users: Box<dyn UserLookup> = Box::new(user_repo);
            let notes: Box<dyn NoteRepository> = Box::new(SqliteNoteRepository::try_new(conn)?);
            Ok((notes, users))
        }
    }
}

fn storage_name(storage: &StorageConfig) -> &'static str {
    match storage {
        StorageConfig::InMemory => "memory",
        StorageConfig::Sqlite { .. } => "sqlite",
    }
}
