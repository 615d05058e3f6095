//! User record.

use chrono::{DateTime, Utc};
use common::UserId;
use contracts::UserDto;

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored lowercased; uniqueness is case-insensitive.
    pub email: String,
    /// PHC string produced by a [`crate::CredentialHasher`].
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, credential_hash: String) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            credential_hash,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}
