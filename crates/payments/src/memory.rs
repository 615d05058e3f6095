//! In-memory payment store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, PaymentId};
use contracts::PaymentStatus;
use tokio::sync::RwLock;

use crate::{Completion, Payment, PaymentStore, Result, StoreError};

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<PaymentId, Payment>,
    by_order: HashMap<OrderId, PaymentId>,
    sequence: Vec<PaymentId>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentStore {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn list(&self) -> Result<Vec<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .sequence
            .iter()
            .rev()
            .filter_map(|id| state.payments.get(id).cloned())
            .collect())
    }

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.state.read().await.payments.get(&id).cloned())
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .by_order
            .get(&order_id)
            .and_then(|id| state.payments.get(id))
            .cloned())
    }

    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let mut state = self.state.write().await;
        if state.by_order.contains_key(&payment.order_id) {
            return Err(StoreError::DuplicateOrder(payment.order_id));
        }
        state.by_order.insert(payment.order_id, payment.id);
        state.sequence.push(payment.id);
        state.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn complete(&self, id: PaymentId, paid_at: DateTime<Utc>) -> Result<Completion> {
        let mut state = self.state.write().await;
        let payment = state.payments.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if payment.is_completed() {
            return Ok(Completion::AlreadyCompleted(payment.clone()));
        }
        payment.status = PaymentStatus::Completed;
        payment.paid_at = Some(paid_at);
        Ok(Completion::Completed(payment.clone()))
    }
}
