//! In-process implementation of the payment contract.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, PaymentId};
use contracts::topics::PAYMENT_COMPLETED;
use contracts::{ContractError, NewPayment, OrderService, PaymentDto, PaymentService, Result};
use event_bus::EventBus;
use service_locator::{LocatorError, OrdersContract, ServiceLocator};

use crate::{AutoApproveGateway, Completion, Payment, PaymentGateway, PaymentStore};

/// The Payments module's own [`PaymentService`].
#[derive(Clone)]
pub struct LocalPaymentService {
    store: Arc<dyn PaymentStore>,
    orders: Arc<dyn OrderService>,
    gateway: Arc<dyn PaymentGateway>,
    events: Arc<EventBus>,
}

impl LocalPaymentService {
    /// Builds the service with the auto-approving gateway, resolving the
    /// Orders contract once.
    pub fn new(
        store: Arc<dyn PaymentStore>,
        locator: &ServiceLocator,
        events: Arc<EventBus>,
    ) -> std::result::Result<Self, LocatorError> {
        let orders = locator.resolve::<OrdersContract>()?;
        Ok(Self::with_orders(store, orders, events))
    }

    pub fn with_orders(
        store: Arc<dyn PaymentStore>,
        orders: Arc<dyn OrderService>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            orders,
            gateway: Arc::new(AutoApproveGateway),
            events,
        }
    }

    /// Replaces the payment gateway.
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Tells Orders the payment went through and announces it.
    ///
    /// Safe to repeat: `mark_as_paid` is a no-op on a paid order.
    async fn settle(&self, completed: Payment) -> Result<PaymentDto> {
        if let Err(err) = self.orders.mark_as_paid(completed.order_id).await {
            tracing::warn!(
                payment_id = %completed.id,
                order_id = %completed.order_id,
                error = %err,
                "order not marked paid; completing the payment again retries it"
            );
            return Err(err);
        }

        let dto = PaymentDto::from(completed);
        self.events
            .publish(PAYMENT_COMPLETED, &dto)
            .await
            .map_err(ContractError::event_publish)?;

        Ok(dto)
    }

    async fn load(&self, payment_id: PaymentId) -> Result<Payment> {
        self.store
            .find(payment_id)
            .await?
            .ok_or_else(|| ContractError::not_found("Payment", payment_id))
    }
}

#[async_trait]
impl PaymentService for LocalPaymentService {
    async fn list(&self) -> Result<Vec<PaymentDto>> {
        let payments = self.store.list().await?;
        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    #[tracing::instrument(skip(self), fields(order_id = %payment.order_id))]
    async fn process(&self, payment: NewPayment) -> Result<PaymentDto> {
        if payment.amount.is_negative() {
            return Err(ContractError::validation("amount must not be negative"));
        }

        // The order must exist before anything is charged for it.
        self.orders.find(payment.order_id).await?;

        let pending = self
            .store
            .insert(Payment::pending(payment.order_id, payment.amount))
            .await?;
        tracing::info!(payment_id = %pending.id, amount = %pending.amount, "payment created");

        self.complete(pending.id).await
    }

    #[tracing::instrument(skip(self))]
    async fn complete(&self, payment_id: PaymentId) -> Result<PaymentDto> {
        let payment = self.load(payment_id).await?;
        if payment.is_completed() {
            tracing::info!(%payment_id, order_id = %payment.order_id, "payment already completed, re-driving order callback");
            return self.settle(payment).await;
        }

        if let Err(err) = self.gateway.charge(&payment).await {
            tracing::warn!(%payment_id, error = %err, "charge failed, payment left pending");
            return Err(ContractError::invalid_state(format!(
                "payment {payment_id} not completed: {err}"
            )));
        }

        let completed = match self.store.complete(payment_id, Utc::now()).await? {
            Completion::Completed(payment) => payment,
            Completion::AlreadyCompleted(_) => {
                return Err(ContractError::invalid_state(format!(
                    "payment {payment_id} is already completed"
                )));
            }
        };

        metrics::counter!("payments_completed_total").increment(1);
        tracing::info!(%payment_id, order_id = %completed.order_id, "payment completed");

        self.settle(completed).await
    }

    async fn find(&self, payment_id: PaymentId) -> Result<PaymentDto> {
        self.load(payment_id).await.map(PaymentDto::from)
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<PaymentDto>> {
        Ok(self
            .store
            .find_by_order(order_id)
            .await?
            .map(PaymentDto::from))
    }
}
