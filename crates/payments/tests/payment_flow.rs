//! Payment processing wired to in-process Orders and Inventory modules.

use std::sync::Arc;

use async_trait::async_trait;
use common::{Money, OrderId, UserId};
use contracts::topics::{ORDER_CREATED, PAYMENT_COMPLETED};
use contracts::{
    ContractError, InventoryService, NewOrder, NewPayment, OrderService, OrderStatus,
    PaymentDto, PaymentService, PaymentStatus,
};
use event_bus::{DomainEvent, EventBus, EventListener, ListenerError};
use inventory::{InMemoryProductStore, LocalInventoryService, default_catalog, seed_catalog};
use orders::{InMemoryOrderStore, LocalOrderService};
use payments::{
    AutoChargeListener, GatewayError, InMemoryPaymentStore, LocalPaymentService, Payment,
    PaymentGateway,
};
use service_locator::{
    InventoryContract, LocatorConfig, OrdersContract, PaymentsContract, ServiceLocator,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct Captured {
    events: Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl EventListener for Captured {
    fn name(&self) -> &'static str {
        "Captured"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn charge(&self, _payment: &Payment) -> Result<(), GatewayError> {
        Err(GatewayError::Declined("card expired".to_string()))
    }
}

struct TestHarness {
    orders: Arc<dyn OrderService>,
    payments: Arc<dyn PaymentService>,
    payment_store: InMemoryPaymentStore,
    bus: Arc<EventBus>,
    completed: Arc<Captured>,
}

impl TestHarness {
    /// Wires the three modules through one locator. With `auto_charge` the
    /// Payments module listens for `order.created`.
    async fn new(auto_charge: bool, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        let locator = ServiceLocator::new(LocatorConfig::local()).unwrap();
        let bus = Arc::new(EventBus::local_only());

        let inventory: Arc<dyn InventoryService> = Arc::new(LocalInventoryService::new(Arc::new(
            InMemoryProductStore::new(),
        )));
        seed_catalog(inventory.as_ref(), default_catalog())
            .await
            .unwrap();
        locator.bind_local::<InventoryContract>(inventory);

        let orders: Arc<dyn OrderService> = Arc::new(
            LocalOrderService::new(Arc::new(InMemoryOrderStore::new()), &locator, bus.clone())
                .unwrap(),
        );
        locator.bind_local::<OrdersContract>(orders.clone());

        let payment_store = InMemoryPaymentStore::new();
        let mut service =
            LocalPaymentService::new(Arc::new(payment_store.clone()), &locator, bus.clone())
                .unwrap();
        if let Some(gateway) = gateway {
            service = service.with_gateway(gateway);
        }
        let payments: Arc<dyn PaymentService> = Arc::new(service);
        locator.bind_local::<PaymentsContract>(payments.clone());

        if auto_charge {
            bus.subscribe(
                ORDER_CREATED,
                Arc::new(AutoChargeListener::new(
                    locator.resolve::<PaymentsContract>().unwrap(),
                    locator.resolve::<OrdersContract>().unwrap(),
                )),
            )
            .await;
        }

        let completed = Arc::new(Captured::default());
        bus.subscribe(PAYMENT_COMPLETED, completed.clone()).await;

        Self {
            orders,
            payments,
            payment_store,
            bus,
            completed,
        }
    }

    async fn order(&self, sku: &str, quantity: u32) -> contracts::OrderDto {
        self.orders
            .create(NewOrder {
                user_id: UserId::new(),
                product_sku: sku.to_string(),
                quantity,
            })
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_order_is_charged_and_marked_paid() {
    let harness = TestHarness::new(true, None).await;

    let order = harness.order("SKU-100", 2).await;

    let payment = harness
        .payments
        .find_by_order(order.id)
        .await
        .unwrap()
        .expect("order should have been charged");
    assert_eq!(payment.amount, Money::from_cents(19800));
    assert_eq!(payment.amount.to_string(), "198.00");
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.paid_at.is_some());

    let order = harness.orders.find(order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Paid);

    let events = harness.completed.events.lock().await;
    assert_eq!(events.len(), 1);
    let published: PaymentDto = events[0].decode().unwrap();
    assert_eq!(published.id, payment.id);
}

#[tokio::test]
async fn test_redelivered_order_created_is_not_charged_twice() {
    let harness = TestHarness::new(true, None).await;
    let order = harness.order("SKU-100", 1).await;

    harness.bus.publish(ORDER_CREATED, &order).await.unwrap();

    assert_eq!(harness.payment_store.payment_count().await, 1);
    assert_eq!(harness.completed.events.lock().await.len(), 1);
}

#[tokio::test]
async fn test_completing_again_only_re_drives_the_callback() {
    let harness = TestHarness::new(false, None).await;
    let order = harness.order("SKU-100", 1).await;

    let payment = harness
        .payments
        .process(NewPayment {
            order_id: order.id,
            amount: order.total,
        })
        .await
        .unwrap();

    let again = harness.payments.complete(payment.id).await.unwrap();
    assert_eq!(again.paid_at, payment.paid_at);
    assert_eq!(harness.payment_store.payment_count().await, 1);

    let order = harness.orders.find(order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(harness.completed.events.lock().await.len(), 2);
}

#[tokio::test]
async fn test_declined_charge_leaves_order_pending() {
    let harness = TestHarness::new(false, Some(Arc::new(DecliningGateway))).await;
    let order = harness.order("SKU-100", 1).await;

    let err = harness
        .payments
        .process(NewPayment {
            order_id: order.id,
            amount: order.total,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::InvalidState { .. }));

    let payment = harness
        .payments
        .find_by_order(order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.paid_at.is_none());

    let order = harness.orders.find(order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(harness.completed.events.lock().await.is_empty());
}

#[tokio::test]
async fn test_payment_for_unknown_order_is_rejected() {
    let harness = TestHarness::new(false, None).await;

    let err = harness
        .payments
        .process(NewPayment {
            order_id: OrderId::new(),
            amount: Money::from_cents(100),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::NotFound { .. }));
    assert_eq!(harness.payment_store.payment_count().await, 0);
}

#[tokio::test]
async fn test_second_payment_for_order_conflicts() {
    let harness = TestHarness::new(true, None).await;
    let order = harness.order("SKU-200", 1).await;

    let err = harness
        .payments
        .process(NewPayment {
            order_id: order.id,
            amount: order.total,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::Conflict { .. }));
}

#[tokio::test]
async fn test_list_is_latest_first() {
    let harness = TestHarness::new(true, None).await;
    let first = harness.order("SKU-100", 1).await;
    let second = harness.order("SKU-200", 1).await;

    let order_ids: Vec<OrderId> = harness
        .payments
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.order_id)
        .collect();
    assert_eq!(order_ids, vec![second.id, first.id]);
}

/// Orders whose first `mark_as_paid` fails, as a timed-out remote call would.
struct FlakyOrders {
    inner: Arc<dyn OrderService>,
    failures_left: Mutex<u32>,
}

#[async_trait]
impl OrderService for FlakyOrders {
    async fn list(&self) -> contracts::Result<Vec<contracts::OrderDto>> {
        self.inner.list().await
    }

    async fn create(&self, order: NewOrder) -> contracts::Result<contracts::OrderDto> {
        self.inner.create(order).await
    }

    async fn create_from_user(
        &self,
        user: contracts::UserDto,
    ) -> contracts::Result<contracts::OrderDto> {
        self.inner.create_from_user(user).await
    }

    async fn mark_as_paid(&self, order_id: OrderId) -> contracts::Result<()> {
        let mut failures_left = self.failures_left.lock().await;
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(ContractError::storage("orders database unavailable"));
        }
        drop(failures_left);
        self.inner.mark_as_paid(order_id).await
    }

    async fn find(&self, order_id: OrderId) -> contracts::Result<contracts::OrderDto> {
        self.inner.find(order_id).await
    }
}

#[tokio::test]
async fn test_failed_order_callback_recovers_on_redelivery() {
    let locator = ServiceLocator::new(LocatorConfig::local()).unwrap();
    let bus = Arc::new(EventBus::local_only());

    let inventory: Arc<dyn InventoryService> = Arc::new(LocalInventoryService::new(Arc::new(
        InMemoryProductStore::new(),
    )));
    seed_catalog(inventory.as_ref(), default_catalog())
        .await
        .unwrap();
    locator.bind_local::<InventoryContract>(inventory);

    let orders: Arc<dyn OrderService> = Arc::new(
        LocalOrderService::new(Arc::new(InMemoryOrderStore::new()), &locator, bus.clone())
            .unwrap(),
    );
    let flaky: Arc<dyn OrderService> = Arc::new(FlakyOrders {
        inner: orders.clone(),
        failures_left: Mutex::new(1),
    });

    let payment_store = InMemoryPaymentStore::new();
    let payments: Arc<dyn PaymentService> = Arc::new(LocalPaymentService::with_orders(
        Arc::new(payment_store.clone()),
        flaky.clone(),
        bus.clone(),
    ));
    bus.subscribe(
        ORDER_CREATED,
        Arc::new(AutoChargeListener::new(payments.clone(), flaky)),
    )
    .await;

    let order = orders
        .create(NewOrder {
            user_id: UserId::new(),
            product_sku: "SKU-100".to_string(),
            quantity: 1,
        })
        .await
        .unwrap();

    // Charged, but the callback failed.
    let payment = payments.find_by_order(order.id).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(
        orders.find(order.id).await.unwrap().status,
        OrderStatus::Pending
    );

    let report = bus.publish(ORDER_CREATED, &order).await.unwrap();
    assert_eq!(report.listener_failures, 0);

    assert_eq!(orders.find(order.id).await.unwrap().status, OrderStatus::Paid);
    assert_eq!(payment_store.payment_count().await, 1);
    let again = payments.find(payment.id).await.unwrap();
    assert_eq!(again.paid_at, payment.paid_at);
}
