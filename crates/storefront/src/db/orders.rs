//! Order queries for the storefront side.
//!
//! Order creation itself lives in [`crate::services::checkout`], which runs
//! the cap re-check and both inserts inside one transaction; the helpers
//! here take a generic executor so they work both on the pool and inside
//! that transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};

use reis_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItemDetail};

/// Repository for customer-facing order reads.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, total, payment_method, status, delivery_address,
                   phone, cpf, notes, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// The lines of one order, joined with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r"
            SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Units of a product already ordered today by a CPF, across non-cancelled
/// orders inside the given day window.
///
/// Takes any executor so the checkout transaction can run it against the
/// same connection that holds the product row lock.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn quantity_ordered_in_window<'e, E>(
    executor: E,
    cpf: &str,
    product_id: ProductId,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<i64, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let quantity: i64 = sqlx::query_scalar(
        r"
        SELECT COALESCE(SUM(oi.quantity), 0)::BIGINT
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE o.cpf = $1
          AND oi.product_id = $2
          AND o.status <> 'cancelled'
          AND o.created_at >= $3
          AND o.created_at < $4
        ",
    )
    .bind(cpf)
    .bind(product_id)
    .bind(window_start)
    .bind(window_end)
    .fetch_one(executor)
    .await?;

    Ok(quantity)
}
