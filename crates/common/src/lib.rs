//! Identifiers and value objects shared across module boundaries.
//!
//! Modules reference each other's aggregates by identifier only, so the
//! identifier types live here rather than in any one module.

pub mod ids;
pub mod money;
pub mod retry;

pub use ids::{OrderId, PaymentId, UserId};
pub use money::Money;
pub use retry::RetryPolicy;
