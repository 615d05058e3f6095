//! Order store errors.

use common::OrderId;
use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Order already exists: {0}")]
    Duplicate(OrderId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ContractError::not_found("Order", id),
            StoreError::Duplicate(id) => ContractError::conflict(format!("order {id} already exists")),
            other => ContractError::storage(other),
        }
    }
}
