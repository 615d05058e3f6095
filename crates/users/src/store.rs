use async_trait::async_trait;
use common::UserId;

use crate::{Result, User};

/// Private persistence of the Users module.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns every user, latest first.
    async fn list(&self) -> Result<Vec<User>>;

    async fn find(&self, id: UserId) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Stores a new user. Fails with `DuplicateEmail` when the email is taken,
    /// even under concurrent inserts.
    async fn insert(&self, user: User) -> Result<User>;
}
