//! Locator error types.

use contracts::ContractId;
use thiserror::Error;

/// Errors raised while resolving a contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocatorError {
    /// Local resolution was required but nothing was bound for the contract.
    #[error("No local implementation bound for {0}")]
    UnboundContract(ContractId),

    /// Remote resolution was required but the contract has no base URL.
    #[error("No remote route configured for {0}")]
    UnmappedContract(ContractId),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Convenience type alias for locator results.
pub type Result<T> = std::result::Result<T, LocatorError>;
