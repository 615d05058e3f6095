//! In-memory user store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::{Result, StoreError, User, UserStore};

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
    sequence: Vec<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<InMemoryUserState>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .sequence
            .iter()
            .rev()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }

    async fn find(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .by_email
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User> {
        let mut state = self.state.write().await;
        if state.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        state.by_email.insert(user.email.clone(), user.id);
        state.sequence.push(user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new("A".to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let store = InMemoryUserStore::new();
        store.insert(user("a@x.com")).await.unwrap();

        let err = store.insert(user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(ref e) if e == "a@x.com"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_email_and_list_order() {
        let store = InMemoryUserStore::new();
        let first = store.insert(user("a@x.com")).await.unwrap();
        let second = store.insert(user("b@x.com")).await.unwrap();

        let found = store.find_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert!(store.find_by_email("c@x.com").await.unwrap().is_none());

        let ids: Vec<UserId> = store.list().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
