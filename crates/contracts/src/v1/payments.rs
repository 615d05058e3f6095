//! Payment contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, PaymentId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Lifecycle of a payment: `pending --(processed)--> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Public view of a payment; also the `payment.completed` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDto {
    pub id: PaymentId,
    pub order_id: OrderId,
    #[serde(rename = "amount_cents")]
    pub amount: Money,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request to charge an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    pub order_id: OrderId,
    #[serde(rename = "amount_cents")]
    pub amount: Money,
}

/// Payment processing owned by the Payments module.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Lists payments, latest first.
    async fn list(&self) -> Result<Vec<PaymentDto>>;

    /// Stores a pending payment and immediately completes it.
    async fn process(&self, payment: NewPayment) -> Result<PaymentDto>;

    /// Completes a pending payment, marks its order paid and publishes
    /// `payment.completed`. Fails with `InvalidState` if already completed.
    async fn complete(&self, payment_id: PaymentId) -> Result<PaymentDto>;

    async fn find(&self, payment_id: PaymentId) -> Result<PaymentDto>;

    /// Returns the payment recorded for an order, if any.
    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<PaymentDto>>;
}

pub mod methods {
    pub const LIST: &str = "list";
    pub const PROCESS: &str = "process";
    pub const COMPLETE: &str = "complete";
    pub const FIND: &str = "find";
    pub const FIND_BY_ORDER: &str = "find_by_order";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessArgs {
    pub payment: NewPayment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIdArgs {
    pub payment_id: PaymentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIdArgs {
    pub order_id: OrderId,
}
