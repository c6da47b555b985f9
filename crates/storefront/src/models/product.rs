//! Catalog row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use reis_core::{ProductId, ProductImageId};

/// A catalog product as stored.
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
}

impl Product {
    /// Highest quantity a single add-to-cart may reach for this product,
    /// folding the stock count and the per-CPF cap together.
    #[must_use]
    pub fn max_order_quantity(&self) -> i64 {
        let stock = i64::from(self.stock.max(0));
        match self.cpf_limit {
            Some(limit) => stock.min(i64::from(limit.max(0))),
            None => stock,
        }
    }

    /// Whether the product can be bought at all.
    #[must_use]
    pub fn purchasable(&self) -> bool {
        self.is_active && self.stock > 0 && self.cpf_limit != Some(0)
    }
}

/// An extra gallery image attached to a product.
#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i32, cpf_limit: Option<i32>, is_active: bool) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Perfume importado".to_string(),
            description: String::new(),
            price: Decimal::new(9900, 2),
            image_url: None,
            stock,
            cpf_limit,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_max_order_quantity_unlimited_cap() {
        assert_eq!(product(8, None, true).max_order_quantity(), 8);
    }

    #[test]
    fn test_max_order_quantity_cap_below_stock() {
        assert_eq!(product(8, Some(3), true).max_order_quantity(), 3);
    }

    #[test]
    fn test_max_order_quantity_stock_below_cap() {
        assert_eq!(product(2, Some(5), true).max_order_quantity(), 2);
    }

    #[test]
    fn test_purchasable() {
        assert!(product(1, None, true).purchasable());
        assert!(!product(0, None, true).purchasable());
        assert!(!product(5, Some(0), true).purchasable());
        assert!(!product(5, None, false).purchasable());
    }
}
