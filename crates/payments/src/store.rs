use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};

use crate::{Completion, Payment, Result};

/// Private persistence of the Payments module.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Returns every payment, latest first.
    async fn list(&self) -> Result<Vec<Payment>>;

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>>;

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Payment>>;

    /// Inserts a payment. Fails with `DuplicateOrder` if the order already has one.
    async fn insert(&self, payment: Payment) -> Result<Payment>;

    /// Atomically moves a pending payment to completed.
    async fn complete(&self, id: PaymentId, paid_at: DateTime<Utc>) -> Result<Completion>;
}
