//! Order row types, back-office shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use reis_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// An order joined with its customer's profile, for the workflow board and
/// the declaration document.
#[derive(Debug, Clone, FromRow)]
pub struct OrderWithCustomer {
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
    pub customer_name: String,
    pub customer_phone: String,
}

impl OrderWithCustomer {
    /// The phone to contact: the profile's, falling back to the one typed at
    /// checkout.
    #[must_use]
    pub fn contact_phone(&self) -> &str {
        if self.customer_phone.trim().is_empty() {
            &self.phone
        } else {
            &self.customer_phone
        }
    }
}

/// An order line joined with its product name.
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

/// One sold order line inside a reporting window, input to the best-seller
/// aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemSale {
    pub product_id: ProductId,
    pub product_name: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

/// Orders per workflow status, for the dashboard cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub in_route: i64,
    pub delivered: i64,
}
