//! Catalog row types, back-office shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use reis_core::{ProductId, ProductImageId};

/// A catalog product as the back office sees it.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    /// Per-CPF daily purchase cap: `None` = unlimited, `Some(0)` = blocked.
    pub cpf_limit: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A gallery image row.
#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    pub position: i32,
}
