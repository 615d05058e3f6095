use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, PaymentId};
use contracts::PaymentStatus;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Completion, Payment, PaymentStore, Result, StoreError};

const COLUMNS: &str = "id, order_id, amount_cents, status, paid_at, created_at";

/// PostgreSQL-backed payment store.
#[derive(Clone)]
pub struct PostgresPaymentStore {
    pool: PgPool,
}

impl PostgresPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the module's tables if they do not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("../migrations/001_create_payments_table.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_payment(row: PgRow) -> Result<Payment> {
        let status: String = row.try_get("status")?;
        Ok(Payment {
            id: PaymentId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            amount: Money::from_cents(row.try_get("amount_cents")?),
            status: status.parse::<PaymentStatus>().map_err(StoreError::Corrupt)?,
            paid_at: row.try_get("paid_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl PaymentStore for PostgresPaymentStore {
    async fn list(&self) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM payments WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_payment)
            .transpose()
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Payment>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM payments WHERE order_id = $1"))
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(Self::row_to_payment)
            .transpose()
    }

    async fn insert(&self, payment: Payment) -> Result<Payment> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, amount_cents, status, paid_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.order_id.as_uuid())
        .bind(payment.amount.cents())
        .bind(payment.status.as_str())
        .bind(payment.paid_at)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::DuplicateOrder(payment.order_id);
            }
            StoreError::Database(e)
        })?;

        Ok(payment)
    }

    async fn complete(&self, id: PaymentId, paid_at: DateTime<Utc>) -> Result<Completion> {
        let updated = sqlx::query(&format!(
            "UPDATE payments SET status = 'completed', paid_at = $2 \
             WHERE id = $1 AND status = 'pending' RETURNING {COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(paid_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Ok(Completion::Completed(Self::row_to_payment(row)?));
        }

        match self.find(id).await? {
            Some(payment) => Ok(Completion::AlreadyCompleted(payment)),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
