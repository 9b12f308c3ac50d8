//! The compiled-in menu and the catalog filter.
//!
//! The catalog is a static list; nothing here allocates per request except
//! the filtered view, which borrows from the catalog.

use std::fmt::Write as _;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::types::{Category, CategoryFilter, Price, Product, ProductId};

/// Contact and location details for the shop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopInfo {
    pub name: &'static str,
    pub address: &'static str,
    pub google_maps_url: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
    pub email: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// The shop's contact card.
pub const SHOP: ShopInfo = ShopInfo {
    name: "New Jyoti Sweets",
    address: "40/22A, Teliyarganj, Prayagraj, Uttar Pradesh 211004",
    google_maps_url: "https://www.google.com/maps/place/New+Jyoti+Sweets/@25.4974641,81.8618869,17z/",
    phone: "+91 94506 00000",
    hours: "7:00 AM - 10:00 PM (Everyday)",
    email: "info@newjyotisweets.com",
    latitude: 25.497_464_1,
    longitude: 81.861_886_9,
};

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    rupees: u32,
    unit: &'static str,
    category: Category,
    image: &'static str,
    best_seller: bool,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "b1",
        name: "Special Paneer Samosa",
        description: "Crispy, hand-folded golden crust stuffed with a savory masala of spiced potatoes, green peas, and fresh malai paneer cubes.",
        rupees: 18,
        unit: "pc",
        category: Category::Breakfast,
        image: "https://images.unsplash.com/photo-1601050690597-df0568f70950?q=80&w=800&auto=format&fit=crop",
        best_seller: true,
    },
    Seed {
        id: "b2",
        name: "Prayagraj Kachori Sabzi",
        description: "Authentic Teliyarganj khasta kachoris served with our signature hing-infused aloo rassa and tangy carrot pickle.",
        rupees: 40,
        unit: "plate",
        category: Category::Breakfast,
        image: "https://images.unsplash.com/photo-1606491956391-70868b5d0f47?q=80&w=800&auto=format&fit=crop",
        best_seller: true,
    },
    Seed {
        id: "b3",
        name: "Masala Chai",
        description: "Aromatic strong tea brewed with fresh ginger, cardamom, and premium tea leaves. The perfect start to your morning.",
        rupees: 20,
        unit: "cup",
        category: Category::Breakfast,
        image: "https://images.unsplash.com/photo-1561336313-0bd5e0b27ec8?q=80&w=800&auto=format&fit=crop",
        best_seller: true,
    },
    Seed {
        id: "b4",
        name: "Bread Pakoda",
        description: "Double-layered bread stuffed with spicy potato mash, coated in a seasoned gram flour batter, and fried to golden perfection.",
        rupees: 25,
        unit: "pc",
        category: Category::Breakfast,
        image: "https://www.cubesnjuliennes.com/wp-content/uploads/2020/04/Bread-Pakora-1-500x500.jpg",
        best_seller: false,
    },
    Seed {
        id: "s1",
        name: "Saffron Rasmalai",
        description: "Delicate heart-shaped cottage cheese discs soaked in a thick, velvety reduced milk flavored with premium Kashmiri kesar.",
        rupees: 45,
        unit: "pc",
        category: Category::Bengali,
        image: "https://img.buzzfeed.com/tasty-app-user-assets-prod-us-east-1/recipes/a051055034094cbca09cdf2082d7a032.jpeg",
        best_seller: true,
    },
    Seed {
        id: "s2",
        name: "Masala Dosa",
        description: "Crispy fermented crepe stuffed with spiced mashed potatoes, served with fresh coconut chutney and aromatic sambar.",
        rupees: 120,
        unit: "plate",
        category: Category::FastFood,
        image: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRYH7H-KRy-dnN9To-d5TJu7dKpY3f_nr0w3Q&s",
        best_seller: false,
    },
    Seed {
        id: "g1",
        name: "Signature Motichoor Laddu",
        description: "Finest pearls of gram flour fried in pure ghee, flavored with rose water and melon seeds. A Prayagraj celebration staple.",
        rupees: 600,
        unit: "kg",
        category: Category::Ghee,
        image: "https://j6e2i8c9.delivery.rocketcdn.me/wp-content/uploads/2016/03/Motichoor-Ladoo-Recipe-5.jpg",
        best_seller: true,
    },
    Seed {
        id: "g2",
        name: "Premium Kaju Katli",
        description: "Smooth, melt-in-the-mouth diamond fudge crafted from the finest cashews and topped with pure edible silver leaf.",
        rupees: 980,
        unit: "kg",
        category: Category::Ghee,
        image: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTO2kvcEVAMllxDNjlkikGbG2Kb0QNnIVfYNg&s",
        best_seller: true,
    },
    Seed {
        id: "g3",
        name: "Chola Samosa",
        description: "Our signature crispy samosas crushed and topped with spicy chickpea curry, tangy chutneys, and fresh onions.",
        rupees: 50,
        unit: "plate",
        category: Category::FastFood,
        image: "https://i.ytimg.com/vi/b4UcQOt4Ioo/sddefault.jpg",
        best_seller: false,
    },
    Seed {
        id: "bk1",
        name: "Eggless Black Forest Cake",
        description: "Layers of moist chocolate sponge, fresh whipped cream, and tart cherries. Finished with chocolate shavings. 100% Veg.",
        rupees: 550,
        unit: "lb",
        category: Category::Bakery,
        image: "https://images.unsplash.com/photo-1578985545062-69928b1d9587?q=80&w=800&auto=format&fit=crop",
        best_seller: false,
    },
    Seed {
        id: "bk2",
        name: "Fresh Pineapple Pastry",
        description: "Light vanilla sponge layered with fresh pineapple chunks and stabilized cream. A refreshing afternoon delight.",
        rupees: 50,
        unit: "pc",
        category: Category::Bakery,
        image: "https://images.unsplash.com/photo-1563729784474-d77dbb933a9e?q=80&w=800&auto=format&fit=crop",
        best_seller: false,
    },
    Seed {
        id: "bk3",
        name: "Red Velvet 3D Dream",
        description: "Stunning crimson cake layers with a smooth cream cheese frosting. A masterpiece for any celebration.",
        rupees: 700,
        unit: "lb",
        category: Category::Bakery,
        image: "https://images.unsplash.com/photo-1616541823729-00fe0aacd32c?q=80&w=800&auto=format&fit=crop",
        best_seller: true,
    },
    Seed {
        id: "ff1",
        name: "Paneer Hakka Noodles",
        description: "Smoky, wok-tossed noodles with crunchy vegetables, fried paneer cubes, and authentic Indo-Chinese sauces.",
        rupees: 110,
        unit: "plate",
        category: Category::FastFood,
        image: "https://images.unsplash.com/photo-1612929633738-8fe44f7ec841?q=80&w=800&auto=format&fit=crop",
        best_seller: false,
    },
    Seed {
        id: "ff2",
        name: "3D Supreme Pizza",
        description: "Fresh hand-tossed dough topped with premium cheese, exotic veggies, and our house-special tangy sauce.",
        rupees: 250,
        unit: "pc",
        category: Category::FastFood,
        image: "https://images.unsplash.com/photo-1574071318508-1cdbab80d002?q=80&w=800&auto=format&fit=crop",
        best_seller: true,
    },
    Seed {
        id: "ff3",
        name: "Crispy Veg Burger",
        description: "A crunchy golden vegetable patty with fresh lettuce, garden tomatoes, and our secret creamy dressing.",
        rupees: 65,
        unit: "pc",
        category: Category::FastFood,
        image: "https://images.unsplash.com/photo-1571091718767-18b5b1457add?q=80&w=800&auto=format&fit=crop",
        best_seller: false,
    },
];

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            price: Price::from_rupees(seed.rupees),
            unit: seed.unit.to_owned(),
            category: seed.category,
            image: seed.image.to_owned(),
            best_seller: seed.best_seller,
        })
        .collect()
});

/// The full menu, in display order.
#[must_use]
pub fn catalog() -> &'static [Product] {
    &CATALOG
}

/// Look up a catalog product by id.
#[must_use]
pub fn find(id: &ProductId) -> Option<&'static Product> {
    catalog().iter().find(|product| product.id == *id)
}

/// Products flagged as best sellers, in catalog order.
pub fn best_sellers() -> impl Iterator<Item = &'static Product> {
    catalog().iter().filter(|product| product.best_seller)
}

/// The visitor's current view of the menu: selected tab plus search text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub search: String,
}

impl MenuQuery {
    /// Create a query for a tab and search text.
    #[must_use]
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// Apply this query to `products`. See [`filter`].
    #[must_use]
    pub fn apply<'a, P>(&self, products: &'a [P]) -> Vec<&'a P>
    where
        P: AsRef<Product>,
    {
        filter(products, self.category, &self.search)
    }
}

impl AsRef<Self> for Product {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Filter `products` by category and a case-insensitive search string.
///
/// Keeps exactly the products in the selected category (any, for
/// [`CategoryFilter::All`]) whose name or description contains `search`,
/// ignoring case. An empty search matches everything. The result preserves
/// the input order and borrows from it.
#[must_use]
pub fn filter<'a, P>(products: &'a [P], category: CategoryFilter, search: &str) -> Vec<&'a P>
where
    P: AsRef<Product>,
{
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|item| {
            let product = (*item).as_ref();
            category.admits(product.category) && product.mentions(&needle)
        })
        .collect()
}

/// One line per product describing the menu, used as context for the
/// recommendation assistant.
///
/// Format: `<name> (<category>): <description> at ₹<price>/<unit>`.
#[must_use]
pub fn menu_digest() -> String {
    let mut digest = String::new();
    for (index, product) in catalog().iter().enumerate() {
        if index > 0 {
            digest.push('\n');
        }
        let _ = write!(
            digest,
            "{} ({}): {} at {}/{}",
            product.name, product.category, product.description, product.price, product.unit
        );
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_catalog_ids_are_unique_and_ordered() {
        let all: Vec<_> = catalog().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            all,
            [
                "b1", "b2", "b3", "b4", "s1", "s2", "g1", "g2", "g3", "bk1", "bk2", "bk3", "ff1",
                "ff2", "ff3"
            ]
        );
    }

    #[test]
    fn test_find() {
        let rasmalai = find(&ProductId::new("s1")).expect("s1 exists");
        assert_eq!(rasmalai.name, "Saffron Rasmalai");
        assert_eq!(rasmalai.price, Price::from_rupees(45));
        assert!(find(&ProductId::new("nope")).is_none());
    }

    #[test]
    fn test_filter_all_empty_search_is_identity() {
        let result = filter(catalog(), CategoryFilter::All, "");
        assert_eq!(result.len(), catalog().len());
    }

    #[test]
    fn test_filter_by_category() {
        let result = filter(catalog(), CategoryFilter::Only(Category::Ghee), "");
        assert_eq!(ids(&result), ["g1", "g2"]);
    }

    #[test]
    fn test_filter_search_is_case_insensitive_over_name_and_description() {
        let by_name = filter(catalog(), CategoryFilter::All, "SAMOSA");
        assert_eq!(ids(&by_name), ["b1", "g3"]);

        // "kesar" only appears in the rasmalai description
        let by_description = filter(catalog(), CategoryFilter::All, "Kesar");
        assert_eq!(ids(&by_description), ["s1"]);
    }

    #[test]
    fn test_filter_category_and_search_combined() {
        let result = filter(catalog(), CategoryFilter::Only(Category::FastFood), "paneer");
        assert_eq!(ids(&result), ["ff1"]);
    }

    #[test]
    fn test_filter_empty_result() {
        let result = filter(catalog(), CategoryFilter::Only(Category::Namkeen), "");
        assert!(result.is_empty());

        let result = filter(catalog(), CategoryFilter::All, "sushi");
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_is_ordered_subsequence() {
        for tab in CategoryFilter::tabs() {
            for query in ["", "a", "cream", "PANEER", "zzz"] {
                let result = filter(catalog(), tab, query);
                let mut cursor = catalog().iter();
                for product in &result {
                    assert!(
                        cursor.any(|candidate| candidate.id == product.id),
                        "{} out of order for {tab:?}/{query}",
                        product.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        for tab in CategoryFilter::tabs() {
            for query in ["", "e", "Chai", "ghee"] {
                let once: Vec<Product> = filter(catalog(), tab, query)
                    .into_iter()
                    .cloned()
                    .collect();
                let twice = filter(&once, tab, query);
                assert_eq!(ids(&twice), ids(&once.iter().collect::<Vec<_>>()));
            }
        }
    }

    #[test]
    fn test_menu_query_apply() {
        let query = MenuQuery::new(CategoryFilter::Only(Category::Bakery), "cake");
        assert_eq!(ids(&query.apply(catalog())), ["bk1", "bk3"]);
    }

    #[test]
    fn test_best_sellers() {
        let ids: Vec<_> = best_sellers().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2", "b3", "s1", "g1", "g2", "bk3", "ff2"]);
    }

    #[test]
    fn test_menu_digest_lines() {
        let digest = menu_digest();
        assert_eq!(digest.lines().count(), catalog().len());
        assert!(digest.contains(
            "Premium Kaju Katli (Ghee Sweets): Smooth, melt-in-the-mouth diamond fudge crafted from the finest cashews and topped with pure edible silver leaf. at ₹980/kg"
        ));
    }
}
