//! Order row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use reis_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A placed order. Immutable after creation except for `status`, which only
/// the back office mutates.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub phone: String,
    pub cpf: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An order line joined with its product name, for display.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshotted at checkout.
    pub price: Decimal,
}

impl OrderItemDetail {
    /// Line subtotal (`quantity * snapshot price`).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
