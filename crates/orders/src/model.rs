//! Order record.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use contracts::{OrderDto, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_sku: String,
    pub quantity: u32,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order.
    pub fn pending(user_id: UserId, product_sku: String, quantity: u32, total: Money) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            product_sku,
            quantity,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            product_sku: o.product_sku,
            quantity: o.quantity,
            total: o.total,
            status: o.status,
            created_at: o.created_at,
        }
    }
}

/// Result of a `pending -> paid` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkPaid {
    /// The order moved from pending to paid.
    Transitioned(Order),
    /// The order was already paid; nothing changed.
    AlreadyPaid(Order),
}
