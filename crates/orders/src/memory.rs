//! In-memory order store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use contracts::OrderStatus;
use tokio::sync::RwLock;

use crate::{MarkPaid, Order, OrderStore, Result, StoreError};

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    /// Insertion order, used for latest-first listings.
    sequence: Vec<OrderId>,
}

/// In-memory order store for testing and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state
            .sequence
            .iter()
            .rev()
            .filter_map(|id| state.orders.get(id).cloned())
            .collect())
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn insert(&self, order: Order) -> Result<Order> {
        let mut state = self.state.write().await;
        if state.orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.id));
        }
        state.sequence.push(order.id);
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn mark_paid(&self, id: OrderId) -> Result<MarkPaid> {
        let mut state = self.state.write().await;
        let order = state.orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if order.is_paid() {
            return Ok(MarkPaid::AlreadyPaid(order.clone()));
        }
        order.status = OrderStatus::Paid;
        Ok(MarkPaid::Transitioned(order.clone()))
    }
}
