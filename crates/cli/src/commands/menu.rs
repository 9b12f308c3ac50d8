//! Menu listing commands.

use jyoti_core::{CategoryFilter, MenuQuery, Product, UnknownCategory, catalog};

/// Print products matching `category` and `search`, one per line.
///
/// # Errors
///
/// Returns `UnknownCategory` if `category` is not a known slug.
#[allow(clippy::print_stdout)]
pub fn list(category: &str, search: &str) -> Result<(), UnknownCategory> {
    let query = MenuQuery::new(category.trim().parse::<CategoryFilter>()?, search.trim());
    let products = query.apply(catalog::catalog());

    if products.is_empty() {
        println!("No delights found matching your taste.");
        return Ok(());
    }

    for product in &products {
        println!("{}", format_line(product));
    }
    tracing::info!(count = products.len(), category = %query.category, "listed menu");
    Ok(())
}

/// Print every category tab as `slug<TAB>label`.
#[allow(clippy::print_stdout)]
pub fn categories() {
    for tab in CategoryFilter::tabs() {
        println!("{}\t{}", tab.slug(), tab.label());
    }
}

fn format_line(product: &Product) -> String {
    let mut marks = String::new();
    if product.best_seller {
        marks.push_str(" [best seller]");
    }
    if product.is_pure_ghee() {
        marks.push_str(" [pure ghee]");
    }
    format!(
        "{:<4} {:<28} {:>6} / {:<8} {}{marks}",
        product.id, product.name, product.price, product.unit, product.category
    )
}

#[cfg(test)]
mod tests {
    use jyoti_core::ProductId;

    use super::*;

    #[test]
    fn test_format_line_marks_best_sellers() {
        let product = catalog::catalog()
            .iter()
            .find(|p| p.best_seller)
            .expect("catalog has a best seller");
        let line = format_line(product);
        assert!(line.starts_with(product.id.as_str()));
        assert!(line.contains("[best seller]"));
    }

    #[test]
    fn test_list_rejects_unknown_category() {
        assert!(list("desserts", "").is_err());
        assert!(list("ghee", "").is_ok());
    }

    #[test]
    fn test_format_line_includes_price() {
        let samosa = catalog::find(&ProductId::new("b1")).expect("b1");
        assert!(format_line(samosa).contains(&samosa.price.to_string()));
    }
}
