//! In-memory product store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::{Product, ProductStore, Result, StoreError};

type Row = Arc<Mutex<Product>>;

/// In-memory store with one async mutex per product row.
///
/// The table lock is only held long enough to look a row up; stock changes
/// serialize on the row's own mutex, so reservations on different SKUs never
/// contend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    rows: Arc<RwLock<HashMap<String, Row>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products.
    pub async fn product_count(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn row(&self, sku: &str) -> Result<Row> {
        self.rows
            .read()
            .await
            .get(sku)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(sku.to_string()))
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn all(&self) -> Result<Vec<Product>> {
        let rows: Vec<Row> = self.rows.read().await.values().cloned().collect();
        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(row.lock().await.clone());
        }
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.sku.cmp(&b.sku)));
        Ok(products)
    }

    async fn find(&self, sku: &str) -> Result<Option<Product>> {
        let row = self.rows.read().await.get(sku).cloned();
        match row {
            Some(row) => Ok(Some(row.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn insert(&self, product: Product) -> Result<Product> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&product.sku) {
            return Err(StoreError::Duplicate(product.sku));
        }
        rows.insert(product.sku.clone(), Arc::new(Mutex::new(product.clone())));
        Ok(product)
    }

    async fn reserve(&self, sku: &str, quantity: u32) -> Result<Product> {
        let row = self.row(sku).await?;
        let mut product = row.lock().await;
        product
            .reserve(quantity)
            .map_err(|available| StoreError::InsufficientStock {
                sku: sku.to_string(),
                requested: quantity,
                available,
            })?;
        Ok(product.clone())
    }

    async fn release(&self, sku: &str, quantity: u32) -> Result<Product> {
        let row = self.row(sku).await?;
        let mut product = row.lock().await;
        if !product.release(quantity) {
            return Err(StoreError::Overflow(sku.to_string()));
        }
        Ok(product.clone())
    }
}
