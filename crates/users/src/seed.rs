//! Startup administrator account.

use contracts::{ContractError, Result};

use crate::{CredentialHasher, User, UserStore};

pub struct AdminAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
        }
    }
}

/// Stores the administrator unless the email is already registered.
///
/// Goes straight to the store, so no `user.created` is published and no
/// welcome order is placed. Returns whether the account was created.
pub async fn seed_admin(
    store: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    account: AdminAccount,
) -> Result<bool> {
    let email = account.email.trim().to_lowercase();
    if store.find_by_email(&email).await?.is_some() {
        return Ok(false);
    }

    let credential_hash = hasher
        .hash(&account.password)
        .map_err(ContractError::storage)?;
    let admin = store
        .insert(User::new(account.name, email, credential_hash))
        .await?;
    tracing::info!(user_id = %admin.id, "admin account seeded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryUserStore, Pbkdf2Hasher};

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let store = InMemoryUserStore::new();
        let hasher = Pbkdf2Hasher::with_rounds(1_000);

        assert!(seed_admin(&store, &hasher, AdminAccount::default()).await.unwrap());
        assert!(!seed_admin(&store, &hasher, AdminAccount::default()).await.unwrap());
        assert_eq!(store.user_count().await, 1);

        let admin = store
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(hasher.verify("password", &admin.credential_hash).unwrap());
    }
}
