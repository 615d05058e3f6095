//! Inventory module.
//!
//! Owns the product catalog and is the only writer of stock levels. Stock is
//! changed through [`contracts::InventoryService::reserve`] and
//! [`contracts::InventoryService::release`], each of which runs under an
//! exclusive per-product lock so concurrent reservations on the same SKU are
//! totally ordered and stock never goes negative.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod seed;
pub mod service;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryProductStore;
pub use model::Product;
pub use postgres::PostgresProductStore;
pub use seed::{default_catalog, seed_catalog};
pub use service::LocalInventoryService;
pub use store::ProductStore;
