//! Payment gateway extension point.

use async_trait::async_trait;
use thiserror::Error;

use crate::Payment;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Charges a payment with an external provider before it is completed.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, payment: &Payment) -> Result<(), GatewayError>;
}

/// Approves every charge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApproveGateway;

#[async_trait]
impl PaymentGateway for AutoApproveGateway {
    async fn charge(&self, payment: &Payment) -> Result<(), GatewayError> {
        tracing::debug!(payment_id = %payment.id, amount = %payment.amount, "charge auto-approved");
        Ok(())
    }
}
