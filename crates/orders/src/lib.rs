//! Orders module.
//!
//! Creating an order reserves stock through the Inventory contract, stores a
//! pending order and publishes `order.created`. The order becomes paid only
//! when the Payments module calls back through `mark_as_paid`.
//!
//! The module also reacts to `user.created` by placing a welcome order for the
//! first product in the catalog.

pub mod error;
pub mod listener;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod service;
pub mod store;

pub use error::{Result, StoreError};
pub use listener::WelcomeOrderListener;
pub use memory::InMemoryOrderStore;
pub use model::{MarkPaid, Order};
pub use postgres::PostgresOrderStore;
pub use service::LocalOrderService;
pub use store::OrderStore;
