//! Product store abstraction.

use async_trait::async_trait;

use crate::{Product, Result};

/// Private persistence of the Inventory module.
///
/// `reserve` and `release` must hold an exclusive lock on the product row for
/// the whole read-check-write sequence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns every product ordered by name, then SKU.
    async fn all(&self) -> Result<Vec<Product>>;

    async fn find(&self, sku: &str) -> Result<Option<Product>>;

    /// Inserts a new product. Fails with `Duplicate` if the SKU exists.
    async fn insert(&self, product: Product) -> Result<Product>;

    /// Atomically decrements stock and returns the updated row.
    async fn reserve(&self, sku: &str, quantity: u32) -> Result<Product>;

    /// Atomically increments stock and returns the updated row.
    async fn release(&self, sku: &str, quantity: u32) -> Result<Product>;
}
