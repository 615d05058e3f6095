//! User contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Public view of a user; also the `user.created` payload.
///
/// Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Registration input. The password is hashed by the Users module and never
/// stored or emitted in clear.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// User registry owned by the Users module.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Lists users, latest first.
    async fn list(&self) -> Result<Vec<UserDto>>;

    /// Stores a user and publishes `user.created`.
    /// Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<UserDto>;

    async fn find(&self, user_id: UserId) -> Result<UserDto>;
}

pub mod methods {
    pub const LIST: &str = "list";
    pub const CREATE: &str = "create";
    pub const FIND: &str = "find";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArgs {
    pub user: NewUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdArgs {
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_debug_redacts_password() {
        let user = NewUser {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "hunter22".to_string(),
        };
        let rendered = format!("{user:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("a@x.com"));
    }

    #[test]
    fn test_dto_has_no_credential_fields() {
        let dto = UserDto {
            id: UserId::new(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(json.get("password").is_none());
        assert!(json.get("credential_hash").is_none());
    }
}
