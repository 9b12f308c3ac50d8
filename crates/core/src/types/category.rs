//! Menu categories and the category selector used by the catalog filter.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category slug is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A fixed menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Breakfast,
    Bengali,
    Ghee,
    Namkeen,
    Bakery,
    FastFood,
}

impl Category {
    /// Every category, in menu tab order.
    pub const ALL: [Self; 6] = [
        Self::Breakfast,
        Self::Bengali,
        Self::Ghee,
        Self::Namkeen,
        Self::Bakery,
        Self::FastFood,
    ];

    /// Human-readable label shown on the menu tabs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Morning Breakfast",
            Self::Bengali => "Bengali Sweets",
            Self::Ghee => "Ghee Sweets",
            Self::Namkeen => "Namkeen",
            Self::Bakery => "Bakery & Cakes",
            Self::FastFood => "Fast Food",
        }
    }

    /// URL-safe identifier used in query strings.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Bengali => "bengali",
            Self::Ghee => "ghee",
            Self::Namkeen => "namkeen",
            Self::Bakery => "bakery",
            Self::FastFood => "fast-food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Category selection for the catalog filter: everything, or one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Slug for the "everything" tab.
    pub const ALL_SLUG: &'static str = "all";

    /// Whether a product in `category` passes this selection.
    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    /// Human-readable label for the tab.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Items",
            Self::Only(category) => category.label(),
        }
    }

    /// URL-safe identifier used in query strings.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => Self::ALL_SLUG,
            Self::Only(category) => category.slug(),
        }
    }

    /// The "All" tab followed by every category, in tab order.
    pub fn tabs() -> impl Iterator<Item = Self> {
        core::iter::once(Self::All).chain(Category::ALL.into_iter().map(Self::Only))
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case(Self::ALL_SLUG) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slug = String::deserialize(deserializer)?;
        slug.parse().map_err(serde::de::Error::custom)
    }
}
