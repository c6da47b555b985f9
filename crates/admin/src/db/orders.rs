//! Order queries for the back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use reis_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{OrderItemDetail, OrderItemSale, OrderWithCustomer, StatusCounts};

const ORDER_COLUMNS: &str = "o.id, o.user_id, o.total, o.payment_method, o.status, \
     o.delivery_address, o.phone, o.cpf, o.notes, o.created_at, \
     u.full_name AS customer_name, u.phone AS customer_phone";

/// Revenue totals only count these statuses.
const REVENUE_STATUSES: &str = "('approved', 'in_route', 'delivered')";

/// A (total, `created_at`) pair used by the finance aggregations.
#[derive(Debug, Clone, FromRow)]
pub struct RevenueRow {
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Repository for back-office order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every order with its customer, newest first (the workflow board).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_customers(&self) -> Result<Vec<OrderWithCustomer>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderWithCustomer>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// One order with its customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_customer(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithCustomer>, RepositoryError> {
        let order = sqlx::query_as::<_, OrderWithCustomer>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
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

    /// Set an order's status. Any status may replace any other; there is no
    /// transition guard in this workflow.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Orders per workflow status (the dashboard cards).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let rows: Vec<(OrderStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM orders GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                OrderStatus::Pending => counts.pending = count,
                OrderStatus::Approved => counts.approved = count,
                OrderStatus::InRoute => counts.in_route = count,
                OrderStatus::Delivered => counts.delivered = count,
                OrderStatus::Cancelled => {}
            }
        }

        Ok(counts)
    }

    /// Revenue-status orders (total, `created_at`) inside a window, for the
    /// finance aggregations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_rows_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RevenueRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, RevenueRow>(&format!(
            r"
            SELECT total, created_at
            FROM orders
            WHERE created_at >= $1 AND created_at <= $2
              AND status IN {REVENUE_STATUSES}
            "
        ))
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Sold order lines inside a window across revenue statuses, input to
    /// the best-seller ranking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderItemSale>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemSale>(&format!(
            r"
            SELECT oi.product_id, p.name AS product_name, p.image_url, oi.quantity, oi.price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.created_at >= $1 AND o.created_at <= $2
              AND o.status IN {REVENUE_STATUSES}
            "
        ))
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
