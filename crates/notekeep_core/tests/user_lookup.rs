use notekeep_core::db::{open_db_in_memory, shared};
use notekeep_core::{
    ErrorKind, InMemoryUserStore, SqliteUserRepository, User, UserLookup, UserStoreError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn rob() -> User {
    User::with_id(Uuid::from_u128(1), "rob", "rob@example.com")
}

#[test]
fn in_memory_store_answers_existence() {
    let store = InMemoryUserStore::new([rob()]).unwrap();
    assert_eq!(store.query_by_id(rob().id).unwrap(), Some(rob()));
    assert_eq!(store.query_by_id(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn in_memory_insert_rejects_duplicates() {
    let store = InMemoryUserStore::default();
    store.insert(rob()).unwrap();

    let err = store.insert(rob()).unwrap_err();
    assert!(matches!(err, UserStoreError::DuplicateId(id) if id == rob().id));
    assert_eq!(err.kind(), ErrorKind::DuplicateId);
}

#[test]
fn in_memory_seed_rejects_duplicate_ids() {
    let twin = User::with_id(rob().id, "bob", "bob@example.com");
    let err = InMemoryUserStore::new([rob(), twin]).err().expect("duplicate seed");
    assert!(matches!(err, UserStoreError::DuplicateId(id) if id == rob().id));
}

#[test]
fn sqlite_repository_roundtrips_users() {
    let repo = SqliteUserRepository::try_new(shared(open_db_in_memory().unwrap())).unwrap();
    repo.create_user(&rob()).unwrap();

    assert_eq!(repo.query_by_id(rob().id).unwrap(), Some(rob()));
    assert_eq!(repo.query_by_id(Uuid::new_v4()).unwrap(), None);

    let err = repo.create_user(&rob()).unwrap_err();
    assert!(matches!(err, UserStoreError::DuplicateId(_)));
}

#[test]
fn sqlite_repository_requires_users_table() {
    let err = SqliteUserRepository::try_new(shared(Connection::open_in_memory().unwrap()))
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, UserStoreError::MissingRequiredTable("users")));
}

#[test]
fn sqlite_reports_non_key_constraint_failures_as_db_errors() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL CHECK (length(name) > 0),
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    let repo = SqliteUserRepository::try_new(shared(conn)).unwrap();

    let nameless = User::with_id(Uuid::from_u128(3), "", "ghost@example.com");
    let err = repo.create_user(&nameless).unwrap_err();
    assert!(matches!(err, UserStoreError::Db(_)), "unexpected error: {err}");
    assert_eq!(err.kind(), ErrorKind::Persistence);
}
