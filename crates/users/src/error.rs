//! User store errors.

use common::UserId;
use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ContractError::not_found("User", id),
            StoreError::DuplicateEmail(email) => {
                ContractError::conflict(format!("email {email} is already registered"))
            }
            other => ContractError::storage(other),
        }
    }
}
