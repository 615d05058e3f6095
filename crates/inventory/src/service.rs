//! In-process implementation of the inventory contract.

use std::sync::Arc;

use async_trait::async_trait;
use contracts::{ContractError, InventoryService, NewProduct, ProductDto, Result};

use crate::{Product, ProductStore, StoreError};

/// The Inventory module's own [`InventoryService`].
#[derive(Clone)]
pub struct LocalInventoryService {
    store: Arc<dyn ProductStore>,
}

impl LocalInventoryService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(ContractError::validation("quantity must be at least 1"));
    }
    Ok(())
}

#[async_trait]
impl InventoryService for LocalInventoryService {
    async fn all(&self) -> Result<Vec<ProductDto>> {
        let products = self.store.all().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductDto>> {
        Ok(self.store.find(sku).await?.map(ProductDto::from))
    }

    #[tracing::instrument(skip(self), fields(sku = %product.sku))]
    async fn create_product(&self, product: NewProduct) -> Result<ProductDto> {
        if product.sku.trim().is_empty() {
            return Err(ContractError::validation("sku must not be empty"));
        }
        if product.name.trim().is_empty() {
            return Err(ContractError::validation("name must not be empty"));
        }
        if product.price.is_negative() {
            return Err(ContractError::validation("price must not be negative"));
        }

        let product = self.store.insert(Product::from(product)).await?;
        tracing::info!(sku = %product.sku, stock = product.stock, "product created");
        Ok(product.into())
    }

    #[tracing::instrument(skip(self))]
    async fn reserve(&self, sku: &str, quantity: u32) -> Result<ProductDto> {
        validate_quantity(quantity)?;

        match self.store.reserve(sku, quantity).await {
            Ok(product) => {
                metrics::counter!("inventory_reservations_total").increment(1);
                tracing::info!(sku, quantity, remaining = product.stock, "stock reserved");
                Ok(product.into())
            }
            Err(err @ StoreError::InsufficientStock { .. }) => {
                metrics::counter!("inventory_reservation_rejections_total").increment(1);
                tracing::info!(sku, quantity, error = %err, "reservation rejected");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn release(&self, sku: &str, quantity: u32) -> Result<ProductDto> {
        validate_quantity(quantity)?;

        let product = self.store.release(sku, quantity).await?;
        tracing::info!(sku, quantity, stock = product.stock, "stock released");
        Ok(product.into())
    }
}
