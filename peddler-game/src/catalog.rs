//! Static item reference data: base price per (category, item).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub category: String,
    pub base_price: u32,
}

/// Errors raised while loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("item {item} in category {category} has non-positive base price {price}")]
    NonPositivePrice {
        category: String,
        item: String,
        price: i64,
    },
}

/// Category name to item name to base price.
///
/// Iteration order is sorted by category, then by item name, so seeded
/// generation is reproducible regardless of the order of the source JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalog {
    categories: BTreeMap<String, BTreeMap<String, u32>>,
}

impl ItemCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from `{ "<category>": { "<item>": <price> } }` JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any price is not a
    /// positive integer.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, BTreeMap<String, i64>> = serde_json::from_str(json)?;
        let mut categories = BTreeMap::new();
        for (category, items) in raw {
            let mut priced = BTreeMap::new();
            for (item, price) in items {
                let valid = u32::try_from(price).ok().filter(|p| *p > 0);
                let Some(price) = valid else {
                    return Err(CatalogError::NonPositivePrice {
                        category,
                        item,
                        price,
                    });
                };
                priced.insert(item, price);
            }
            categories.insert(category, priced);
        }
        Ok(Self { categories })
    }

    /// Build a catalog from `(category, item, base price)` triples.
    /// Zero prices are raised to 1 so the positivity invariant holds.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, u32)>) -> Self {
        let mut categories: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        for (category, item, price) in entries {
            categories
                .entry(category.to_string())
                .or_default()
                .insert(item.to_string(), price.max(1));
        }
        Self { categories }
    }

    /// Category names in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Items of one category; unknown categories yield nothing.
    pub fn items_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = Item> + 'a {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(move |items| {
                items.iter().map(move |(name, price)| Item {
                    name: name.clone(),
                    category: category.to_string(),
                    base_price: *price,
                })
            })
    }

    /// Every item across all categories, in catalog order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.categories.iter().flat_map(|(category, items)| {
            items.iter().map(move |(name, price)| Item {
                name: name.clone(),
                category: category.clone(),
                base_price: *price,
            })
        })
    }

    /// First item with this name in catalog order. Names are unique within a
    /// category but may repeat across categories.
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<Item> {
        self.categories.iter().find_map(|(category, items)| {
            items.get(name).map(|price| Item {
                name: name.to_string(),
                category: category.clone(),
                base_price: *price,
            })
        })
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_from_json_orders_categories() {
        let json = r#"{
            "Spices": { "Pepper": 120, "Salt": 40 },
            "Herbs": { "Root": 80, "Herb": 100 }
        }"#;
        let catalog = ItemCatalog::from_json(json).unwrap();
        assert_eq!(catalog.categories(), vec!["Herbs", "Spices"]);
        assert_eq!(catalog.len(), 4);
        let herbs: Vec<String> = catalog.items_in("Herbs").map(|i| i.name).collect();
        assert_eq!(herbs, vec!["Herb", "Root"]);
        assert_eq!(catalog.items_in("Missing").count(), 0);
    }

    #[test]
    fn rejects_non_positive_prices() {
        let err = ItemCatalog::from_json(r#"{ "Herbs": { "Weed": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NonPositivePrice { ref item, price: 0, .. } if item == "Weed"
        ));
        assert!(ItemCatalog::from_json(r#"{ "Herbs": { "Weed": -3 } }"#).is_err());
    }

    #[test]
    fn find_item_prefers_first_category() {
        let catalog = ItemCatalog::from_entries([
            ("Tools", "Rope", 30),
            ("Cloth", "Rope", 12),
            ("Cloth", "Silk", 300),
        ]);
        let rope = catalog.find_item("Rope").unwrap();
        assert_eq!(rope.category, "Cloth");
        assert_eq!(rope.base_price, 12);
        assert!(catalog.find_item("Anvil").is_none());
    }

    #[test]
    fn from_entries_floors_zero_prices() {
        let catalog = ItemCatalog::from_entries([("Junk", "Pebble", 0)]);
        assert_eq!(catalog.find_item("Pebble").unwrap().base_price, 1);
    }
}
