//! In-process implementation of the order contract.

use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use contracts::topics::ORDER_CREATED;
use contracts::{
    ContractError, InventoryService, NewOrder, OrderDto, OrderService, Result, UserDto,
};
use event_bus::EventBus;
use service_locator::{InventoryContract, LocatorError, ServiceLocator};

use crate::{MarkPaid, Order, OrderStore};

/// The Orders module's own [`OrderService`].
///
/// Inventory is reached only through the contract handle obtained from the
/// service locator, so it may live in this process or behind the network.
#[derive(Clone)]
pub struct LocalOrderService {
    store: Arc<dyn OrderStore>,
    inventory: Arc<dyn InventoryService>,
    events: Arc<EventBus>,
}

impl LocalOrderService {
    /// Builds the service, resolving the Inventory contract once.
    pub fn new(
        store: Arc<dyn OrderStore>,
        locator: &ServiceLocator,
        events: Arc<EventBus>,
    ) -> std::result::Result<Self, LocatorError> {
        let inventory = locator.resolve::<InventoryContract>()?;
        Ok(Self::with_inventory(store, inventory, events))
    }

    pub fn with_inventory(
        store: Arc<dyn OrderStore>,
        inventory: Arc<dyn InventoryService>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            inventory,
            events,
        }
    }

    /// Gives back a reservation whose order could not be stored.
    async fn release_reservation(&self, sku: &str, quantity: u32) {
        if let Err(error) = self.inventory.release(sku, quantity).await {
            tracing::error!(sku, quantity, error = %error, "failed to release reservation");
        }
    }
}

#[async_trait]
impl OrderService for LocalOrderService {
    async fn list(&self) -> Result<Vec<OrderDto>> {
        let orders = self.store.list().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    #[tracing::instrument(skip(self), fields(sku = %order.product_sku, quantity = order.quantity))]
    async fn create(&self, order: NewOrder) -> Result<OrderDto> {
        if order.quantity == 0 {
            return Err(ContractError::validation("quantity must be at least 1"));
        }

        let product = self
            .inventory
            .reserve(&order.product_sku, order.quantity)
            .await?;

        let Some(total) = product.price.checked_multiply(order.quantity) else {
            self.release_reservation(&order.product_sku, order.quantity)
                .await;
            return Err(ContractError::validation("order total overflows"));
        };

        let pending = Order::pending(order.user_id, order.product_sku, order.quantity, total);
        let stored = match self.store.insert(pending).await {
            Ok(stored) => stored,
            Err(err) => {
                self.release_reservation(&product.sku, order.quantity).await;
                return Err(err.into());
            }
        };

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %stored.id, total = %stored.total, "order created");

        let dto = OrderDto::from(stored);
        self.events
            .publish(ORDER_CREATED, &dto)
            .await
            .map_err(ContractError::event_publish)?;

        Ok(dto)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_from_user(&self, user: UserDto) -> Result<OrderDto> {
        let product = self
            .inventory
            .all()
            .await?
            .into_iter()
            .next()
            .ok_or(ContractError::NoProductsAvailable)?;

        tracing::info!(sku = %product.sku, "placing welcome order");
        self.create(NewOrder {
            user_id: user.id,
            product_sku: product.sku,
            quantity: 1,
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn mark_as_paid(&self, order_id: OrderId) -> Result<()> {
        match self.store.mark_paid(order_id).await? {
            MarkPaid::Transitioned(_) => {
                metrics::counter!("orders_paid_total").increment(1);
                tracing::info!(%order_id, "order paid");
            }
            MarkPaid::AlreadyPaid(_) => {
                tracing::debug!(%order_id, "order already paid");
            }
        }
        Ok(())
    }

    async fn find(&self, order_id: OrderId) -> Result<OrderDto> {
        self.store
            .find(order_id)
            .await?
            .map(OrderDto::from)
            .ok_or_else(|| ContractError::not_found("Order", order_id))
    }
}
