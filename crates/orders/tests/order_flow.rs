//! Order creation against a real in-process Inventory module.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{Money, OrderId, UserId};
use contracts::topics::{ORDER_CREATED, USER_CREATED};
use contracts::{
    ContractError, ContractId, InventoryService, NewOrder, OrderDto, OrderService, OrderStatus,
    UserDto,
};
use event_bus::{DomainEvent, EventBus, EventListener, ListenerError};
use inventory::{InMemoryProductStore, LocalInventoryService, default_catalog, seed_catalog};
use orders::{
    InMemoryOrderStore, LocalOrderService, MarkPaid, Order, OrderStore, StoreError,
    WelcomeOrderListener,
};
use service_locator::{InventoryContract, LocatorConfig, LocatorError, ServiceLocator};
use tokio::sync::Mutex;

/// Captures every event published on a topic.
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

/// An order store whose writes always fail.
struct BrokenStore;

#[async_trait]
impl OrderStore for BrokenStore {
    async fn list(&self) -> orders::Result<Vec<Order>> {
        Ok(vec![])
    }

    async fn find(&self, _id: OrderId) -> orders::Result<Option<Order>> {
        Ok(None)
    }

    async fn insert(&self, _order: Order) -> orders::Result<Order> {
        Err(StoreError::Corrupt("disk full".to_string()))
    }

    async fn mark_paid(&self, id: OrderId) -> orders::Result<MarkPaid> {
        Err(StoreError::NotFound(id))
    }
}

struct TestHarness {
    inventory: Arc<dyn InventoryService>,
    orders: Arc<LocalOrderService>,
    store: InMemoryOrderStore,
    bus: Arc<EventBus>,
    created: Arc<Captured>,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_catalog(true).await
    }

    async fn with_catalog(seed: bool) -> Self {
        let inventory: Arc<dyn InventoryService> = Arc::new(LocalInventoryService::new(Arc::new(
            InMemoryProductStore::new(),
        )));
        if seed {
            seed_catalog(inventory.as_ref(), default_catalog())
                .await
                .unwrap();
        }

        let locator = ServiceLocator::new(LocatorConfig::local()).unwrap();
        locator.bind_local::<InventoryContract>(inventory.clone());

        let bus = Arc::new(EventBus::local_only());
        let created = Arc::new(Captured::default());
        bus.subscribe(ORDER_CREATED, created.clone()).await;

        let store = InMemoryOrderStore::new();
        let orders = Arc::new(
            LocalOrderService::new(Arc::new(store.clone()), &locator, bus.clone()).unwrap(),
        );

        Self {
            inventory,
            orders,
            store,
            bus,
            created,
        }
    }

    async fn stock(&self, sku: &str) -> u32 {
        self.inventory
            .find_by_sku(sku)
            .await
            .unwrap()
            .unwrap()
            .stock
    }
}

fn new_user() -> UserDto {
    UserDto {
        id: UserId::new(),
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_create_reserves_stock_and_publishes() {
    let harness = TestHarness::new().await;
    let user_id = UserId::new();

    let order = harness
        .orders
        .create(NewOrder {
            user_id,
            product_sku: "SKU-100".to_string(),
            quantity: 2,
        })
        .await
        .unwrap();

    assert_eq!(order.total, Money::from_cents(19800));
    assert_eq!(order.total.to_string(), "198.00");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(harness.stock("SKU-100").await, 98);

    let events = harness.created.events.lock().await;
    assert_eq!(events.len(), 1);
    let published: OrderDto = events[0].decode().unwrap();
    assert_eq!(published, order);
}

#[tokio::test]
async fn test_insufficient_stock_creates_nothing() {
    let harness = TestHarness::new().await;

    let err = harness
        .orders
        .create(NewOrder {
            user_id: UserId::new(),
            product_sku: "SKU-100".to_string(),
            quantity: 1000,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::InsufficientStock { .. }));
    assert_eq!(harness.stock("SKU-100").await, 100);
    assert_eq!(harness.store.order_count().await, 0);
    assert!(harness.created.events.lock().await.is_empty());
}

#[tokio::test]
async fn test_unknown_product_creates_nothing() {
    let harness = TestHarness::new().await;

    let err = harness
        .orders
        .create(NewOrder {
            user_id: UserId::new(),
            product_sku: "SKU-404".to_string(),
            quantity: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::NotFound { .. }));
    assert_eq!(harness.store.order_count().await, 0);
}

#[tokio::test]
async fn test_failed_insert_releases_reservation() {
    let harness = TestHarness::new().await;
    let orders = LocalOrderService::with_inventory(
        Arc::new(BrokenStore),
        harness.inventory.clone(),
        harness.bus.clone(),
    );

    let err = orders
        .create(NewOrder {
            user_id: UserId::new(),
            product_sku: "SKU-100".to_string(),
            quantity: 5,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::Storage { .. }));
    assert_eq!(harness.stock("SKU-100").await, 100);
}

#[tokio::test]
async fn test_welcome_order_uses_first_product_by_name() {
    let harness = TestHarness::new().await;
    let user = new_user();

    let order = harness.orders.create_from_user(user.clone()).await.unwrap();

    // "Enterprise Plan" sorts before "Premium Plan".
    assert_eq!(order.product_sku, "SKU-200");
    assert_eq!(order.quantity, 1);
    assert_eq!(order.user_id, user.id);
    assert_eq!(order.total, Money::from_units(499));
}

#[tokio::test]
async fn test_welcome_order_with_empty_catalog() {
    let harness = TestHarness::with_catalog(false).await;
    let err = harness
        .orders
        .create_from_user(new_user())
        .await
        .unwrap_err();
    assert_eq!(err, ContractError::NoProductsAvailable);
}

#[tokio::test]
async fn test_mark_as_paid_is_idempotent() {
    let harness = TestHarness::new().await;
    let order = harness.orders.create_from_user(new_user()).await.unwrap();

    harness.orders.mark_as_paid(order.id).await.unwrap();
    harness.orders.mark_as_paid(order.id).await.unwrap();

    let stored = harness.orders.find(order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);

    let err = harness
        .orders
        .mark_as_paid(OrderId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_is_latest_first() {
    let harness = TestHarness::new().await;
    let first = harness.orders.create_from_user(new_user()).await.unwrap();
    let second = harness.orders.create_from_user(new_user()).await.unwrap();

    let listed: Vec<OrderId> = harness
        .orders
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(listed, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_user_created_event_triggers_welcome_order() {
    let harness = TestHarness::new().await;
    harness
        .bus
        .subscribe(
            USER_CREATED,
            Arc::new(WelcomeOrderListener::new(harness.orders.clone())),
        )
        .await;

    let user = new_user();
    let report = harness.bus.publish(USER_CREATED, &user).await.unwrap();

    assert_eq!(report.listener_failures, 0);
    let orders = harness.orders.list().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].user_id, user.id);
}

#[tokio::test]
async fn test_inventory_must_be_bound() {
    let locator = ServiceLocator::new(LocatorConfig::local()).unwrap();
    let result = LocalOrderService::new(
        Arc::new(InMemoryOrderStore::new()),
        &locator,
        Arc::new(EventBus::local_only()),
    );
    assert_eq!(
        result.err(),
        Some(LocatorError::UnboundContract(ContractId::Inventory))
    );
}
