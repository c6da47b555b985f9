//! Sales goal row type.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A daily sales target.
#[derive(Debug, Clone, FromRow)]
pub struct SalesGoal {
    pub goal_date: NaiveDate,
    pub target_amount: Decimal,
}
