use async_trait::async_trait;
use common::{Money, OrderId, UserId};
use contracts::OrderStatus;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{MarkPaid, Order, OrderStore, Result, StoreError};

const COLUMNS: &str = "id, user_id, product_sku, quantity, total_cents, status, created_at";

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the module's tables if they do not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("../migrations/001_create_orders_table.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let id = OrderId::from_uuid(row.try_get::<Uuid, _>("id")?);
        let quantity: i64 = row.try_get("quantity")?;
        let status: String = row.try_get("status")?;

        Ok(Order {
            id,
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            product_sku: row.try_get("product_sku")?,
            quantity: u32::try_from(quantity)
                .map_err(|_| StoreError::Corrupt(format!("quantity {quantity} on order {id}")))?,
            total: Money::from_cents(row.try_get("total_cents")?),
            status: status.parse::<OrderStatus>().map_err(StoreError::Corrupt)?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn list(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_order)
            .transpose()
    }

    async fn insert(&self, order: Order) -> Result<Order> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, product_sku, quantity, total_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(&order.product_sku)
        .bind(i64::from(order.quantity))
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Duplicate(order.id);
            }
            StoreError::Database(e)
        })?;

        Ok(order)
    }

    async fn mark_paid(&self, id: OrderId) -> Result<MarkPaid> {
        let updated = sqlx::query(&format!(
            "UPDATE orders SET status = 'paid' WHERE id = $1 AND status = 'pending' RETURNING {COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Ok(MarkPaid::Transitioned(Self::row_to_order(row)?));
        }

        match self.find(id).await? {
            Some(order) => Ok(MarkPaid::AlreadyPaid(order)),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
