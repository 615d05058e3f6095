use async_trait::async_trait;
use common::Money;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{Product, ProductStore, Result, StoreError};

/// PostgreSQL-backed product store.
///
/// Stock changes run in a transaction that takes the row with
/// `SELECT ... FOR UPDATE`.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the module's tables if they do not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("../migrations/001_create_products_table.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let sku: String = row.try_get("sku")?;
        let stock: i64 = row.try_get("stock")?;
        let stock = u32::try_from(stock)
            .map_err(|_| StoreError::Corrupt(format!("stock {stock} out of range for {sku}")))?;
        Ok(Product {
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock,
            sku,
        })
    }

    async fn change_stock(
        &self,
        sku: &str,
        apply: impl FnOnce(&mut Product) -> Result<()> + Send,
    ) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT sku, name, price_cents, stock FROM products WHERE sku = $1 FOR UPDATE",
        )
        .bind(sku)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(sku.to_string()))?;

        let mut product = Self::row_to_product(row)?;
        apply(&mut product)?;

        sqlx::query("UPDATE products SET stock = $2 WHERE sku = $1")
            .bind(sku)
            .bind(i64::from(product.stock))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(product)
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn all(&self) -> Result<Vec<Product>> {
        let rows =
            sqlx::query("SELECT sku, name, price_cents, stock FROM products ORDER BY name, sku")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn find(&self, sku: &str) -> Result<Option<Product>> {
        sqlx::query("SELECT sku, name, price_cents, stock FROM products WHERE sku = $1")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_product)
            .transpose()
    }

    async fn insert(&self, product: Product) -> Result<Product> {
        sqlx::query("INSERT INTO products (sku, name, price_cents, stock) VALUES ($1, $2, $3, $4)")
            .bind(&product.sku)
            .bind(&product.name)
            .bind(product.price.cents())
            .bind(i64::from(product.stock))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return StoreError::Duplicate(product.sku.clone());
                }
                StoreError::Database(e)
            })?;

        Ok(product)
    }

    async fn reserve(&self, sku: &str, quantity: u32) -> Result<Product> {
        self.change_stock(sku, |product| {
            product
                .reserve(quantity)
                .map_err(|available| StoreError::InsufficientStock {
                    sku: product.sku.clone(),
                    requested: quantity,
                    available,
                })
        })
        .await
    }

    async fn release(&self, sku: &str, quantity: u32) -> Result<Product> {
        self.change_stock(sku, |product| {
            if product.release(quantity) {
                Ok(())
            } else {
                Err(StoreError::Overflow(product.sku.clone()))
            }
        })
        .await
    }
}
