//! Payment store errors.

use common::{OrderId, PaymentId};
use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Payment not found: {0}")]
    NotFound(PaymentId),

    /// Each order carries at most one payment.
    #[error("Order {0} already has a payment")]
    DuplicateOrder(OrderId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ContractError::not_found("Payment", id),
            StoreError::DuplicateOrder(id) => {
                ContractError::conflict(format!("order {id} already has a payment"))
            }
            other => ContractError::storage(other),
        }
    }
}
