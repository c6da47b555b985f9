//! Best-seller rankings.
//!
//! Folds sold order lines into per-product totals. Revenue is quantity
//! times the snapshot price of each line, so price changes after a sale
//! never rewrite history.

use std::collections::HashMap;

use rust_decimal::Decimal;

use reis_core::ProductId;

use crate::models::OrderItemSale;

/// Aggregated sales for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSellerRow {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    /// Units sold in the window.
    pub total_quantity: i64,
    /// Revenue in the window (sum of `quantity * snapshot price`).
    pub total_revenue: Decimal,
    /// Number of order lines the product appeared on.
    pub line_count: usize,
}

/// Ranking order for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Quantity,
    Revenue,
}

impl SortKey {
    /// Parse the query-string value; anything unknown falls back to quantity.
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        match s {
            "revenue" => Self::Revenue,
            _ => Self::Quantity,
        }
    }
}

/// Fold sold lines into one row per product.
#[must_use]
pub fn aggregate(sales: &[OrderItemSale]) -> Vec<BestSellerRow> {
    let mut map: HashMap<ProductId, BestSellerRow> = HashMap::new();

    for sale in sales {
        let entry = map.entry(sale.product_id).or_insert_with(|| BestSellerRow {
            product_id: sale.product_id,
            name: sale.product_name.clone(),
            image_url: sale.image_url.clone(),
            total_quantity: 0,
            total_revenue: Decimal::ZERO,
            line_count: 0,
        });
        entry.total_quantity += i64::from(sale.quantity);
        entry.total_revenue += sale.price * Decimal::from(sale.quantity);
        entry.line_count += 1;
    }

    map.into_values().collect()
}

/// Sort rows by the chosen key, descending.
pub fn sort(rows: &mut [BestSellerRow], key: SortKey) {
    match key {
        SortKey::Quantity => rows.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity)),
        SortKey::Revenue => rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(product_id: i32, name: &str, quantity: i32, price_cents: i64) -> OrderItemSale {
        OrderItemSale {
            product_id: ProductId::new(product_id),
            product_name: name.to_string(),
            image_url: None,
            quantity,
            price: Decimal::new(price_cents, 2),
        }
    }

    #[test]
    fn test_aggregate_folds_lines_per_product() {
        let sales = vec![
            sale(1, "Perfume", 2, 10_000),
            sale(1, "Perfume", 3, 9_000), // sold again at a lower snapshot
            sale(2, "Relógio", 1, 25_000),
        ];

        let mut rows = aggregate(&sales);
        sort(&mut rows, SortKey::Quantity);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Perfume");
        assert_eq!(rows[0].total_quantity, 5);
        // 2 * 100.00 + 3 * 90.00 = 470.00
        assert_eq!(rows[0].total_revenue, Decimal::new(47_000, 2));
        assert_eq!(rows[0].line_count, 2);
        assert_eq!(rows[1].total_quantity, 1);
    }

    #[test]
    fn test_sort_by_revenue() {
        let sales = vec![
            sale(1, "Caro", 1, 50_000),  // 500.00
            sale(2, "Popular", 10, 2_000), // 200.00
        ];

        let mut rows = aggregate(&sales);
        sort(&mut rows, SortKey::Revenue);
        assert_eq!(rows[0].name, "Caro");

        sort(&mut rows, SortKey::Quantity);
        assert_eq!(rows[0].name, "Popular");
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_sort_key_from_param() {
        assert_eq!(SortKey::from_param("revenue"), SortKey::Revenue);
        assert_eq!(SortKey::from_param("qty"), SortKey::Quantity);
        assert_eq!(SortKey::from_param(""), SortKey::Quantity);
    }
}
