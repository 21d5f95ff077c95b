//! User lookup contract and user stores.
//!
//! # Responsibility
//! - Answer "does this user exist" for note ownership checks.
//! - Persist user records for the SQLite deployment.
//!
//! # Invariants
//! - `query_by_id` returns `Ok(None)` for unknown users; errors are reserved
//!   for storage failures.

use crate::db::{table_exists, DbError, SharedConnection};
use crate::error::ErrorKind;
use crate::model::user::{User, UserId};
use rusqlite::{ffi, params, Connection};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub type UserResult<T> = Result<T, UserStoreError>;

/// Error for user persistence and lookup.
#[derive(Debug)]
pub enum UserStoreError {
    DuplicateId(UserId),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    LockPoisoned,
}

impl UserStoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            _ => ErrorKind::Persistence,
        }
    }
}

impl Display for UserStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "user already exists: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::LockPoisoned => write!(f, "user store lock poisoned"),
        }
    }
}

impl Error for UserStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for UserStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Existence check for user IDs, consumed by note creation.
pub trait UserLookup: Send + Sync {
    /// Returns the user when it exists.
    fn query_by_id(&self, user_id: UserId) -> UserResult<Option<User>>;
}

impl<U: UserLookup + ?Sized> UserLookup for Arc<U> {
    fn query_by_id(&self, user_id: UserId) -> UserResult<Option<User>> {
        (**self).query_by_id(user_id)
    }
}

impl<U: UserLookup + ?Sized> UserLookup for Box<U> {
    fn query_by_id(&self, user_id: UserId) -> UserResult<Option<User>> {
        (**self).query_by_id(user_id)
    }
}

/// Map-backed user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Creates a store seeded with `users`.
    ///
    /// Fails with `DuplicateId` when two seed users share an ID.
    pub fn new(users: impl IntoIterator<Item = User>) -> UserResult<Self> {
        let mut map = HashMap::new();
        for user in users {
            match map.entry(user.id) {
                Entry::Occupied(_) => return Err(UserStoreError::DuplicateId(user.id)),
                Entry::Vacant(slot) => {
                    slot.insert(user);
                }
            }
        }

        Ok(Self {
            users: Mutex::new(map),
        })
    }

    /// Adds one user. Fails with `DuplicateId` when the ID is taken.
    pub fn insert(&self, user: User) -> UserResult<()> {
        let mut users = self.lock()?;
        if users.contains_key(&user.id) {
            return Err(UserStoreError::DuplicateId(user.id));
        }
        users.insert(user.id, user);
        Ok(())
    }

    fn lock(&self) -> UserResult<MutexGuard<'_, HashMap<UserId, User>>> {
        self.users.lock().map_err(|_| UserStoreError::LockPoisoned)
    }
}

impl UserLookup for InMemoryUserStore {
    fn query_by_id(&self, user_id: UserId) -> UserResult<Option<User>> {
        Ok(self.lock()?.get(&user_id).cloned())
    }
}

/// SQLite-backed user repository sharing the notes connection.
pub struct SqliteUserRepository {
    conn: SharedConnection,
}

impl SqliteUserRepository {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: SharedConnection) -> UserResult<Self> {
        {
            let guard = conn.lock().map_err(|_| UserStoreError::LockPoisoned)?;
            if !table_exists(&guard, "users")? {
                return Err(UserStoreError::MissingRequiredTable("users"));
            }
        }
        Ok(Self { conn })
    }

    /// Stores a new user. Fails with `DuplicateId` when the ID is taken.
    pub fn create_user(&self, user: &User) -> UserResult<()> {
        let inserted = self.lock()?.execute(
            "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.name, user.email],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(UserStoreError::DuplicateId(user.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn lock(&self) -> UserResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| UserStoreError::LockPoisoned)
    }
}

impl UserLookup for SqliteUserRepository {
    fn query_by_id(&self, user_id: UserId) -> UserResult<Option<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, email FROM users WHERE id = ?1;")?;
        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let id = Uuid::parse_str(&id_text).map_err(|_| {
                UserStoreError::InvalidData(format!("invalid uuid value `{id_text}` in users.id"))
            })?;
            let name: String = row.get("name")?;
            let email: String = row.get("email")?;
            return Ok(Some(User::with_id(id, name, email)));
        }

        Ok(None)
    }
}
