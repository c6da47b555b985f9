//! Sales goal queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use reis_core::UserId;

use super::RepositoryError;
use crate::models::SalesGoal;

/// Repository for daily sales goals.
pub struct GoalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GoalRepository<'a> {
    /// Create a new goal repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Goals inside a date range (inclusive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SalesGoal>, RepositoryError> {
        let goals = sqlx::query_as::<_, SalesGoal>(
            r"
            SELECT goal_date, target_amount
            FROM sales_goals
            WHERE goal_date >= $1 AND goal_date <= $2
            ORDER BY goal_date ASC
            ",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(goals)
    }

    /// Upsert a batch of daily targets, keyed by date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any upsert fails.
    pub async fn upsert_many(
        &self,
        goals: &[(NaiveDate, Decimal)],
        created_by: UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for (goal_date, target_amount) in goals {
            sqlx::query(
                r"
                INSERT INTO sales_goals (goal_date, target_amount, created_by)
                VALUES ($1, $2, $3)
                ON CONFLICT (goal_date)
                DO UPDATE SET target_amount = EXCLUDED.target_amount, updated_at = NOW()
                ",
            )
            .bind(goal_date)
            .bind(target_amount)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
