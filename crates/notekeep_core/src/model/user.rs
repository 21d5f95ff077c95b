//! User record referenced by note ownership.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one user.
pub type UserId = Uuid;

/// User record owned by the domain layer.
///
/// Credentials live with the authentication layer and are not modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// Creates a user with a freshly generated ID.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email)
    }

    pub fn with_id(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}
