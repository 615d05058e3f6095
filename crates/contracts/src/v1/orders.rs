//! Order contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::v1::users::UserDto;

/// Lifecycle of an order: `pending --(payment completed)--> paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Public view of an order; also the `order.created` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_sku: String,
    pub quantity: u32,
    #[serde(rename = "total_cents")]
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A purchase intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub product_sku: String,
    pub quantity: u32,
}

/// Order management owned by the Orders module.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Lists orders, latest first.
    async fn list(&self) -> Result<Vec<OrderDto>>;

    /// Reserves stock, stores a pending order and publishes `order.created`.
    async fn create(&self, order: NewOrder) -> Result<OrderDto>;

    /// Creates a quantity-1 welcome order for the first catalog product.
    async fn create_from_user(&self, user: UserDto) -> Result<OrderDto>;

    /// Moves a pending order to paid. A no-op for an already paid order.
    async fn mark_as_paid(&self, order_id: OrderId) -> Result<()>;

    async fn find(&self, order_id: OrderId) -> Result<OrderDto>;
}

pub mod methods {
    pub const LIST: &str = "list";
    pub const CREATE: &str = "create";
    pub const CREATE_FROM_USER: &str = "create_from_user";
    pub const MARK_AS_PAID: &str = "mark_as_paid";
    pub const FIND: &str = "find";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArgs {
    pub order: NewOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFromUserArgs {
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIdArgs {
    pub order_id: OrderId,
}
