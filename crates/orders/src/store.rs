use async_trait::async_trait;
use common::OrderId;

use crate::{MarkPaid, Order, Result};

/// Private persistence of the Orders module.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns every order, latest first.
    async fn list(&self) -> Result<Vec<Order>>;

    async fn find(&self, id: OrderId) -> Result<Option<Order>>;

    async fn insert(&self, order: Order) -> Result<Order>;

    /// Moves an order to paid. Must be atomic with respect to concurrent callers
    /// so the transition happens exactly once.
    async fn mark_paid(&self, id: OrderId) -> Result<MarkPaid>;
}
