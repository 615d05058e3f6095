//! Inventory contract.

use async_trait::async_trait;
use common::Money;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Public view of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub sku: String,
    pub name: String,
    #[serde(rename = "price_cents")]
    pub price: Money,
    pub stock: u32,
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(rename = "price_cents")]
    pub price: Money,
    pub stock: u32,
}

/// Catalog and stock management owned by the Inventory module.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Lists the catalog ordered by product name.
    async fn all(&self) -> Result<Vec<ProductDto>>;

    /// Looks a product up by SKU.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductDto>>;

    /// Adds a product to the catalog. Fails with `Conflict` on a duplicate SKU.
    async fn create_product(&self, product: NewProduct) -> Result<ProductDto>;

    /// Decrements stock under an exclusive row lock.
    ///
    /// Fails with `NotFound` for an unknown SKU and with `InsufficientStock`
    /// when `stock < quantity`. Returns the post-decrement snapshot.
    async fn reserve(&self, sku: &str, quantity: u32) -> Result<ProductDto>;

    /// Compensating increment for a previous reservation.
    async fn release(&self, sku: &str, quantity: u32) -> Result<ProductDto>;
}

pub mod methods {
    pub const ALL: &str = "all";
    pub const FIND_BY_SKU: &str = "find_by_sku";
    pub const CREATE_PRODUCT: &str = "create_product";
    pub const RESERVE: &str = "reserve";
    pub const RELEASE: &str = "release";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuArgs {
    pub sku: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductArgs {
    pub product: NewProduct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockArgs {
    pub sku: String,
    pub quantity: u32,
}
