use std::sync::Arc;

use async_trait::async_trait;
use contracts::{NewPayment, OrderDto, OrderService, OrderStatus, PaymentService, PaymentStatus};
use event_bus::{DomainEvent, EventListener, ListenerError};

/// Charges every newly created order for its total.
///
/// A redelivered event never charges twice. If the order already has a
/// completed payment but is still pending, the payment is completed again so
/// the order callback gets another try.
pub struct AutoChargeListener {
    payments: Arc<dyn PaymentService>,
    orders: Arc<dyn OrderService>,
}

impl AutoChargeListener {
    pub fn new(payments: Arc<dyn PaymentService>, orders: Arc<dyn OrderService>) -> Self {
        Self { payments, orders }
    }
}

#[async_trait]
impl EventListener for AutoChargeListener {
    fn name(&self) -> &'static str {
        "AutoChargeListener"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError> {
        let order: OrderDto = event.decode()?;

        if let Some(existing) = self.payments.find_by_order(order.id).await? {
            if existing.status != PaymentStatus::Completed {
                tracing::debug!(order_id = %order.id, payment_id = %existing.id, "order has a pending payment");
                return Ok(());
            }
            if self.orders.find(order.id).await?.status == OrderStatus::Paid {
                tracing::debug!(order_id = %order.id, payment_id = %existing.id, "order already charged");
                return Ok(());
            }
            self.payments.complete(existing.id).await?;
            tracing::info!(order_id = %order.id, payment_id = %existing.id, "order callback re-driven");
            return Ok(());
        }

        let payment = self
            .payments
            .process(NewPayment {
                order_id: order.id,
                amount: order.total,
            })
            .await?;
        tracing::debug!(order_id = %order.id, payment_id = %payment.id, "order charged");
        Ok(())
    }
}
