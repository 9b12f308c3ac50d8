//! Catalog product type.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A sellable menu item.
///
/// Products come only from the compiled-in catalog and are never created or
/// mutated at runtime; the cart keeps its own copy alongside the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price per `unit`.
    pub price: Price,
    /// Selling unit label ("kg", "pc", "plate", ...).
    pub unit: String,
    pub category: Category,
    /// Image URL.
    pub image: String,
    #[serde(default)]
    pub best_seller: bool,
}

impl Product {
    /// Whether the product is made in pure desi ghee (gets the "Pure Ghee" badge).
    #[must_use]
    pub fn is_pure_ghee(&self) -> bool {
        self.category == Category::Ghee
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
