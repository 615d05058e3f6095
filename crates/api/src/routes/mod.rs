//! HTTP handlers.

pub mod contracts;
pub mod health;
pub mod inventory;
pub mod metrics;
pub mod orders;
pub mod payments;
pub mod users;

use crate::error::ApiError;

/// Parses a path segment into an identifier.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
