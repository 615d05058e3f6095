//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contracts::ContractError;
use contracts::wire::Fault;
use service_locator::LocatorError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Error returned by a module contract.
    Contract(ContractError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Contract(err) => {
                let status = contract_status(&err);
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                }
                (status, err.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        ApiError::Contract(err)
    }
}

/// HTTP status for a contract error.
pub fn contract_status(err: &ContractError) -> StatusCode {
    match err {
        ContractError::NotFound { .. } => StatusCode::NOT_FOUND,
        ContractError::InsufficientStock { .. }
        | ContractError::NoProductsAvailable
        | ContractError::InvalidState { .. }
        | ContractError::Conflict { .. } => StatusCode::CONFLICT,
        ContractError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ContractError::RemoteCall(_) | ContractError::EventPublish { .. } => {
            StatusCode::BAD_GATEWAY
        }
        ContractError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error of a contract endpoint; the body carries the typed error so the
/// calling adapter can rebuild it.
#[derive(Debug)]
pub struct FaultResponse(pub ContractError);

impl IntoResponse for FaultResponse {
    fn into_response(self) -> Response {
        let status = contract_status(&self.0);
        (status, axum::Json(Fault { error: self.0 })).into_response()
    }
}

impl From<ContractError> for FaultResponse {
    fn from(err: ContractError) -> Self {
        FaultResponse(err)
    }
}

/// Failures while assembling the application at startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("database connection failed for {module}: {source}")]
    Database {
        module: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration failed for {module}: {message}")]
    Migration {
        module: &'static str,
        message: String,
    },

    #[error("broker setup failed: {0}")]
    Broker(String),

    #[error("seeding failed: {0}")]
    Seed(#[from] ContractError),
}
