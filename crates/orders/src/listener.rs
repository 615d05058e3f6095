use std::sync::Arc;

use async_trait::async_trait;
use contracts::{OrderService, UserDto};
use event_bus::{DomainEvent, EventListener, ListenerError};

/// Places a welcome order when a user is created.
pub struct WelcomeOrderListener {
    orders: Arc<dyn OrderService>,
}

impl WelcomeOrderListener {
    pub fn new(orders: Arc<dyn OrderService>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl EventListener for WelcomeOrderListener {
    fn name(&self) -> &'static str {
        "WelcomeOrderListener"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError> {
        let user: UserDto = event.decode()?;
        let order = self.orders.create_from_user(user).await?;
        tracing::debug!(order_id = %order.id, "welcome order placed");
        Ok(())
    }
}
