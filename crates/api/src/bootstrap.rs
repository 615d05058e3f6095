//! Assembles the modules into one process.
//!
//! Every module is hosted here and bound to the locator as its local
//! implementation. The handles used by the HTTP routes, the saga listeners and
//! the modules themselves come from the locator, so the configured mode
//! decides whether a call stays in-process or goes over the network. Contract
//! endpoints always serve the local implementation.

use std::sync::Arc;

use contracts::topics::{ORDER_CREATED, USER_CREATED};
use contracts::{ContractId, InventoryService, OrderService, PaymentService, UserService};
use event_bus::{BusMode, EventBus, EventBusConfig, NullPublisher, RemotePublisher};
use inventory::{
    InMemoryProductStore, LocalInventoryService, PostgresProductStore, ProductStore,
    default_catalog, seed_catalog,
};
use orders::{InMemoryOrderStore, LocalOrderService, OrderStore, PostgresOrderStore, WelcomeOrderListener};
use payments::{
    AutoChargeListener, InMemoryPaymentStore, LocalPaymentService, PaymentStore,
    PostgresPaymentStore,
};
use service_locator::{
    InventoryContract, OrdersContract, PaymentsContract, ServiceLocator, UsersContract,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use users::{
    AdminAccount, InMemoryUserStore, LocalUserService, Pbkdf2Hasher, PostgresUserStore,
    UserStore, seed_admin,
};

use crate::config::Config;
use crate::error::BootstrapError;

/// One handle per contract.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub orders: Arc<dyn OrderService>,
    pub payments: Arc<dyn PaymentService>,
    pub inventory: Arc<dyn InventoryService>,
}

/// Shared application state accessible from all handlers.
pub struct AppState {
    /// Locator-resolved handles; local or remote depending on the mode.
    pub services: Services,
    /// This process's own implementations, served on the contract endpoints.
    pub local: Services,
    pub locator: Arc<ServiceLocator>,
    pub events: Arc<EventBus>,
}

/// Builds the application state, including the event bus described by the
/// configuration.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, BootstrapError> {
    let events = Arc::new(build_event_bus(&config.event_bus)?);
    build_state_with_bus(config, events).await
}

/// Builds the application state around an existing event bus.
pub async fn build_state_with_bus(
    config: &Config,
    events: Arc<EventBus>,
) -> Result<Arc<AppState>, BootstrapError> {
    let locator = Arc::new(ServiceLocator::new(config.locator.clone())?);

    let product_store = product_store(config).await?;
    let order_store = order_store(config).await?;
    let payment_store = payment_store(config).await?;
    let user_store = user_store(config).await?;

    // Each module resolves its dependencies while being built, so bind in
    // dependency order.
    let inventory: Arc<dyn InventoryService> = Arc::new(LocalInventoryService::new(product_store));
    locator.bind_local::<InventoryContract>(inventory.clone());

    let orders: Arc<dyn OrderService> =
        Arc::new(LocalOrderService::new(order_store, &locator, events.clone())?);
    locator.bind_local::<OrdersContract>(orders.clone());

    let payments: Arc<dyn PaymentService> =
        Arc::new(LocalPaymentService::new(payment_store, &locator, events.clone())?);
    locator.bind_local::<PaymentsContract>(payments.clone());

    let hasher = Arc::new(Pbkdf2Hasher::with_rounds(config.credential_rounds));
    let users: Arc<dyn UserService> = Arc::new(
        LocalUserService::new(user_store.clone(), events.clone()).with_hasher(hasher.clone()),
    );
    locator.bind_local::<UsersContract>(users.clone());

    if config.seed_catalog {
        seed_catalog(inventory.as_ref(), default_catalog()).await?;
        seed_admin(user_store.as_ref(), hasher.as_ref(), AdminAccount::default()).await?;
    }

    let services = Services {
        users: locator.resolve::<UsersContract>()?,
        orders: locator.resolve::<OrdersContract>()?,
        payments: locator.resolve::<PaymentsContract>()?,
        inventory: locator.resolve::<InventoryContract>()?,
    };

    for contract in ContractId::ALL {
        tracing::info!(contract = %contract, resolution = ?locator.plan(contract)?, "contract wired");
    }

    // Listeners act on whichever deployment owns the contract, so a module
    // routed elsewhere keeps the rows its reactions create.
    events
        .subscribe(
            USER_CREATED,
            Arc::new(WelcomeOrderListener::new(services.orders.clone())),
        )
        .await;
    events
        .subscribe(
            ORDER_CREATED,
            Arc::new(AutoChargeListener::new(
                services.payments.clone(),
                services.orders.clone(),
            )),
        )
        .await;

    Ok(Arc::new(AppState {
        services,
        local: Services {
            users,
            orders,
            payments,
            inventory,
        },
        locator,
        events,
    }))
}

/// Creates the event bus, with the Kafka producer when external delivery is on.
pub fn build_event_bus(config: &EventBusConfig) -> Result<EventBus, BootstrapError> {
    let publisher: Arc<dyn RemotePublisher> = match config.mode {
        BusMode::LocalOnly => Arc::new(NullPublisher),
        BusMode::External => external_publisher(config)?,
    };
    tracing::info!(mode = ?config.mode, brokers = %config.brokers, "event bus created");
    Ok(EventBus::new(config.clone(), publisher))
}

#[cfg(feature = "kafka")]
fn external_publisher(config: &EventBusConfig) -> Result<Arc<dyn RemotePublisher>, BootstrapError> {
    let publisher =
        event_bus::KafkaPublisher::new(config).map_err(|e| BootstrapError::Broker(e.to_string()))?;
    Ok(Arc::new(publisher))
}

#[cfg(not(feature = "kafka"))]
fn external_publisher(_config: &EventBusConfig) -> Result<Arc<dyn RemotePublisher>, BootstrapError> {
    Err(BootstrapError::Broker(
        "EVENT_BUS_MODE=kafka needs a build with the `kafka` feature".to_string(),
    ))
}

async fn connect(config: &Config, contract: ContractId) -> Result<Option<PgPool>, BootstrapError> {
    let Some(url) = config.database_url_for(contract) else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await
        .map_err(|source| BootstrapError::Database {
            module: contract.service_name(),
            source,
        })?;
    tracing::info!(module = contract.service_name(), "connected to PostgreSQL");
    Ok(Some(pool))
}

fn migration_error(module: &'static str, err: impl ToString) -> BootstrapError {
    BootstrapError::Migration {
        module,
        message: err.to_string(),
    }
}

async fn product_store(config: &Config) -> Result<Arc<dyn ProductStore>, BootstrapError> {
    Ok(match connect(config, ContractId::Inventory).await? {
        Some(pool) => {
            let store = PostgresProductStore::new(pool);
            store
                .migrate()
                .await
                .map_err(|e| migration_error("inventory", e))?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryProductStore::new()),
    })
}

async fn order_store(config: &Config) -> Result<Arc<dyn OrderStore>, BootstrapError> {
    Ok(match connect(config, ContractId::Orders).await? {
        Some(pool) => {
            let store = PostgresOrderStore::new(pool);
            store
                .migrate()
                .await
                .map_err(|e| migration_error("orders", e))?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryOrderStore::new()),
    })
}

async fn payment_store(config: &Config) -> Result<Arc<dyn PaymentStore>, BootstrapError> {
    Ok(match connect(config, ContractId::Payments).await? {
        Some(pool) => {
            let store = PostgresPaymentStore::new(pool);
            store
                .migrate()
                .await
                .map_err(|e| migration_error("payments", e))?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryPaymentStore::new()),
    })
}

async fn user_store(config: &Config) -> Result<Arc<dyn UserStore>, BootstrapError> {
    Ok(match connect(config, ContractId::Users).await? {
        Some(pool) => {
            let store = PostgresUserStore::new(pool);
            store
                .migrate()
                .await
                .map_err(|e| migration_error("users", e))?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryUserStore::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_locator::{LocatorConfig, LocatorMode, Resolution};

    #[tokio::test]
    async fn test_local_wiring_seeds_catalog() {
        let config = Config {
            credential_rounds: 1_000,
            ..Config::default()
        };
        let state = build_state(&config).await.unwrap();

        let catalog = state.services.inventory.all().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(state.events.listener_count(USER_CREATED).await, 1);
        assert_eq!(state.events.listener_count(ORDER_CREATED).await, 1);
        for contract in ContractId::ALL {
            assert_eq!(state.locator.plan(contract).unwrap(), Resolution::Local);
        }
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let config = Config {
            seed_catalog: false,
            ..Config::default()
        };
        let state = build_state(&config).await.unwrap();
        assert!(state.services.inventory.all().await.unwrap().is_empty());
        assert!(state.services.users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_mode_without_urls_fails_fast() {
        let config = Config {
            locator: LocatorConfig::local().with_mode(LocatorMode::Remote),
            seed_catalog: false,
            ..Config::default()
        };
        let err = build_state(&config).await.err().unwrap();
        assert!(matches!(err, BootstrapError::Locator(_)));
    }

    #[cfg(not(feature = "kafka"))]
    #[test]
    fn test_external_bus_needs_kafka_feature() {
        let config = EventBusConfig {
            mode: BusMode::External,
            ..EventBusConfig::default()
        };
        assert!(matches!(
            build_event_bus(&config),
            Err(BootstrapError::Broker(_))
        ));
    }
}
