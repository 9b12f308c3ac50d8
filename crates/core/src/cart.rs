//! In-memory shopping cart.
//!
//! The cart is deliberately permissive: every mutation succeeds, and ids that
//! are not in the cart are ignored rather than reported. Two invariants hold
//! after every operation:
//!
//! - each line has a quantity of at least 1
//! - a product id appears on at most one line

use serde::Serialize;

use crate::types::{Price, Product, ProductId};

/// One product in the cart with its chosen quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product: Product,
    quantity: u32,
}

impl CartLine {
    /// Number of units on this line (always at least 1).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// An insertion-ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1.
    pub fn add_item(&mut self, product: &Product) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
    }

    /// Adjust the quantity of the line for `id` by `delta`, never going below 1.
    ///
    /// Does nothing if the product is not in the cart.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) {
        if let Some(line) = self.line_mut(id) {
            let target = i64::from(line.quantity).saturating_add(delta).max(1);
            line.quantity = u32::try_from(target).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line for `id`, if present.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.lines.retain(|line| line.product.id != *id);
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines (the cart badge).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{catalog, find};
    use crate::types::Category;

    fn product(id: &str, rupees: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_rupees(rupees),
            unit: "pc".to_string(),
            category: Category::Bengali,
            image: String::new(),
            best_seller: false,
        }
    }

    fn expected_total(cart: &Cart) -> Price {
        cart.lines()
            .iter()
            .map(|line| line.product.price.times(line.quantity()))
            .sum()
    }

    #[test]
    fn test_add_change_remove_scenario() {
        let rasmalai = find(&ProductId::new("s1")).expect("s1 exists");
        let mut cart = Cart::new();

        cart.add_item(rasmalai);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total(), Price::from_rupees(45));

        cart.add_item(rasmalai);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Price::from_rupees(90));
        assert_eq!(cart.lines().len(), 1);

        cart.change_quantity(&rasmalai.id, -5);
        assert_eq!(cart.line(&rasmalai.id).map(CartLine::quantity), Some(1));
        assert_eq!(cart.total(), Price::from_rupees(45));

        cart.remove_item(&rasmalai.id);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_add_existing_increments_by_one_without_new_line() {
        let mut cart = Cart::new();
        let a = product("a", 10);
        let b = product("b", 20);
        cart.add_item(&a);
        cart.add_item(&b);
        cart.change_quantity(&a.id, 4);

        let before = cart.line(&a.id).map(CartLine::quantity);
        cart.add_item(&a);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(&a.id).map(CartLine::quantity), before.map(|q| q + 1));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        for id in ["g2", "b3", "ff2"] {
            cart.add_item(find(&ProductId::new(id)).expect("catalog product"));
        }
        cart.add_item(find(&ProductId::new("b3")).expect("catalog product"));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["g2", "b3", "ff2"]);
    }

    #[test]
    fn test_change_quantity_never_below_one() {
        let mut cart = Cart::new();
        let a = product("a", 5);
        cart.add_item(&a);

        for delta in [-1, -2, 0, i64::MIN, -1_000_000, 3, i64::MAX, i64::MIN] {
            cart.change_quantity(&a.id, delta);
            let quantity = cart.line(&a.id).map_or(0, CartLine::quantity);
            assert!(quantity >= 1, "quantity {quantity} after delta {delta}");
        }
    }

    #[test]
    fn test_change_quantity_saturates_high() {
        let mut cart = Cart::new();
        let a = product("a", 1);
        cart.add_item(&a);
        cart.change_quantity(&a.id, i64::MAX);
        assert_eq!(cart.line(&a.id).map(CartLine::quantity), Some(u32::MAX));

        cart.add_item(&a);
        assert_eq!(cart.line(&a.id).map(CartLine::quantity), Some(u32::MAX));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 5));
        let snapshot = cart.clone();

        cart.change_quantity(&ProductId::new("missing"), 3);
        cart.remove_item(&ProductId::new("missing"));

        assert_eq!(cart, snapshot);
    }

    #[test]
    fn test_total_matches_sum_over_operation_sequence() {
        let mut cart = Cart::new();
        let products = catalog();

        for (step, product) in products.iter().cycle().take(40).enumerate() {
            match step % 4 {
                0 | 1 => cart.add_item(product),
                2 => cart.change_quantity(&product.id, i64::try_from(step).unwrap_or(0) - 20),
                _ => cart.remove_item(&product.id),
            }
            assert_eq!(cart.total(), expected_total(&cart));
            assert_eq!(
                cart.count(),
                cart.lines().iter().map(|l| u64::from(l.quantity())).sum::<u64>()
            );
        }

        for product in products {
            cart.remove_item(&product.id);
        }
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_product_ids_unique_across_lines() {
        let mut cart = Cart::new();
        for product in catalog().iter().chain(catalog()) {
            cart.add_item(product);
        }
        assert_eq!(cart.lines().len(), catalog().len());
        assert!(cart.lines().iter().all(|line| line.quantity() == 2));
    }
}
