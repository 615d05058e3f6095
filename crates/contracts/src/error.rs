//! Error taxonomy shared by every contract method.
//!
//! The enum is serializable so a module reached over the network can hand a
//! business error back to its caller unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by contract methods, whether invoked locally or remotely.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractError {
    /// The referenced aggregate does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Not enough stock to satisfy a reservation.
    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    /// The catalog is empty, so no welcome order can be synthesized.
    #[error("No products available to seed welcome order")]
    NoProductsAvailable,

    /// The aggregate is not in a state that allows the operation.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// The request itself is malformed.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A uniqueness rule was violated.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A call through the network adapter failed.
    #[error("{0}")]
    RemoteCall(RemoteCallError),

    /// A domain event could not be handed to the broker.
    #[error("Event publish failed: {message}")]
    EventPublish { message: String },

    /// The module's private store failed.
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl ContractError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        ContractError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        ContractError::InvalidState {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ContractError::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ContractError::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        ContractError::Storage {
            message: message.to_string(),
        }
    }

    pub fn event_publish(message: impl ToString) -> Self {
        ContractError::EventPublish {
            message: message.to_string(),
        }
    }

    /// Returns true for business-rule errors.
    ///
    /// These propagate to the caller untouched and are never retried.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            ContractError::NotFound { .. }
                | ContractError::InsufficientStock { .. }
                | ContractError::NoProductsAvailable
                | ContractError::InvalidState { .. }
                | ContractError::Validation { .. }
                | ContractError::Conflict { .. }
        )
    }
}

impl From<RemoteCallError> for ContractError {
    fn from(err: RemoteCallError) -> Self {
        ContractError::RemoteCall(err)
    }
}

/// Details of a failed network call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Service call to {url} ({contract}.{method}) failed: {reason}")]
pub struct RemoteCallError {
    pub contract: String,
    pub method: String,
    pub url: String,
    pub reason: RemoteFailure,
}

/// Why a network call failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFailure {
    /// The remote module answered with a non-success status.
    Status(u16),
    /// No answer within the per-call timeout.
    Timeout,
    /// Connection-level failure.
    Transport(String),
    /// The response body did not match the contract.
    Decode(String),
}

impl std::fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteFailure::Status(status) => write!(f, "status {status}"),
            RemoteFailure::Timeout => write!(f, "timed out"),
            RemoteFailure::Transport(msg) => write!(f, "transport error: {msg}"),
            RemoteFailure::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

/// Convenience type alias for contract results.
pub type Result<T> = std::result::Result<T, ContractError>;
