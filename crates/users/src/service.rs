//! In-process implementation of the user contract.

use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use contracts::topics::USER_CREATED;
use contracts::{ContractError, NewUser, Result, UserDto, UserService};
use event_bus::EventBus;

use crate::{CredentialHasher, Pbkdf2Hasher, User, UserStore};

const MAX_NAME_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 6;

/// The Users module's own [`UserService`].
#[derive(Clone)]
pub struct LocalUserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    events: Arc<EventBus>,
}

impl LocalUserService {
    pub fn new(store: Arc<dyn UserStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            hasher: Arc::new(Pbkdf2Hasher::default()),
            events,
        }
    }

    /// Replaces the credential hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Checks a login attempt against the stored credential.
    ///
    /// Unknown emails and wrong passwords both yield `false`.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<bool> {
        let Some(user) = self.store.find_by_email(&normalize_email(email)).await? else {
            return Ok(false);
        };
        self.hasher
            .verify(password, &user.credential_hash)
            .map_err(ContractError::storage)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Rejects input a registration form would refuse.
fn validate(user: &NewUser, email: &str) -> Result<()> {
    let name = user.name.trim();
    if name.is_empty() {
        return Err(ContractError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ContractError::validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    let valid_email = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid_email {
        return Err(ContractError::validation(format!(
            "{email:?} is not a valid email address"
        )));
    }

    if user.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ContractError::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[async_trait]
impl UserService for LocalUserService {
    async fn list(&self) -> Result<Vec<UserDto>> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, user: NewUser) -> Result<UserDto> {
        let email = normalize_email(&user.email);
        validate(&user, &email)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(ContractError::conflict(format!(
                "email {email} is already registered"
            )));
        }

        let credential_hash = self
            .hasher
            .hash(&user.password)
            .map_err(ContractError::storage)?;
        let stored = self
            .store
            .insert(User::new(user.name.trim().to_string(), email, credential_hash))
            .await?;

        metrics::counter!("users_created_total").increment(1);
        tracing::info!(user_id = %stored.id, "user created");

        let dto = UserDto::from(stored);
        self.events
            .publish(USER_CREATED, &dto)
            .await
            .map_err(ContractError::event_publish)?;

        Ok(dto)
    }

    async fn find(&self, user_id: UserId) -> Result<UserDto> {
        self.store
            .find(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| ContractError::not_found("User", user_id))
    }
}
