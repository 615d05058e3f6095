//! Inventory store errors.

use contracts::ContractError;
use thiserror::Error;

/// Errors raised by a [`crate::ProductStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    #[error("Product already exists: {0}")]
    Duplicate(String),

    /// A release would push stock past the representable range.
    #[error("Stock overflow for {0}")]
    Overflow(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(sku) => ContractError::not_found("Product", sku),
            StoreError::InsufficientStock {
                sku,
                requested,
                available,
            } => ContractError::InsufficientStock {
                sku,
                requested,
                available,
            },
            StoreError::Duplicate(sku) => {
                ContractError::conflict(format!("product {sku} already exists"))
            }
            StoreError::Overflow(sku) => {
                ContractError::validation(format!("stock overflow for {sku}"))
            }
            other => ContractError::storage(other),
        }
    }
}
