//! Payment record.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, PaymentId};
use contracts::{PaymentDto, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a pending payment for an order.
    pub fn pending(order_id: OrderId, amount: Money) -> Self {
        Self {
            id: PaymentId::new(),
            order_id,
            amount,
            status: PaymentStatus::Pending,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            order_id: p.order_id,
            amount: p.amount,
            status: p.status,
            paid_at: p.paid_at,
            created_at: p.created_at,
        }
    }
}

/// Result of a `pending -> completed` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Completed(Payment),
    AlreadyCompleted(Payment),
}
