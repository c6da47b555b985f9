//! The session-held shopping cart.
//!
//! The cart is transient client state: it lives in the session and is only
//! persisted as an order (plus items) at checkout. One line per product;
//! the name and unit price are snapshotted when the line is added, and the
//! order is written from these snapshots, not from a re-fetch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reis_core::ProductId;

/// One cart line: a product reference with a quantity and price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The whole cart. Default is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// The resulting quantity is clamped to `max_quantity` (stock and
    /// per-CPF cap folded together by the caller). Returns the quantity the
    /// line ended up with.
    pub fn add(&mut self, line: CartLine, max_quantity: u32) -> u32 {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity = existing
                .quantity
                .saturating_add(line.quantity)
                .min(max_quantity);
            existing.quantity
        } else {
            let quantity = line.quantity.min(max_quantity).max(1);
            self.lines.push(CartLine { quantity, ..line });
            quantity
        }
    }

    /// Set a line's quantity (floored at 1). Unknown products are ignored.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity.max(1);
        }
    }

    /// Remove a product's line.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units across all lines (the navbar badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Produto {id}"),
            unit_price: Decimal::new(price, 2),
            quantity,
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::default();
        let got = cart.add(line(1, 5000, 2), 10);
        assert_eq!(got, 2);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 10);
        let got = cart.add(line(1, 5000, 3), 10);
        assert_eq!(got, 5);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_add_clamps_to_max() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 3);
        let got = cart.add(line(1, 5000, 4), 3);
        assert_eq!(got, 3);
    }

    #[test]
    fn test_set_quantity_floors_at_one() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 10);
        cart.set_quantity(ProductId::new(1), 0);
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 10);
        cart.add(line(2, 2000, 1), 10);
        cart.remove(ProductId::new(1));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].product_id, ProductId::new(2));
    }

    #[test]
    fn test_subtotal_and_count() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 10); // 100.00
        cart.add(line(2, 2550, 3), 10); // 76.50
        assert_eq!(cart.subtotal(), Decimal::new(17650, 2));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::default();
        cart.add(line(1, 5000, 2), 10);
        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
