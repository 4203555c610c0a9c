//! Peddler Market Engine
//!
//! Platform-agnostic market-state generation for the peddler trading board
//! game: which goods a location offers, at what prices, and how that offer
//! set rotates across repeated visits. This crate has no UI or storage
//! backend; callers inject both.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod location;
pub mod market;
pub mod numbers;
pub mod offers;
pub mod pricing;
pub mod rng;
pub mod rotation;
pub mod sampling;
pub mod store;
pub mod visits;

// Re-export commonly used types
pub use catalog::{CatalogError, Item, ItemCatalog};
pub use config::{ConfigError, MarketConfig};
pub use location::{Location, LocationDirectory, LocationError, Tier};
pub use market::{MarketGenerator, MarketSnapshot};
pub use offers::{OfferEntry, OfferListBuilder, OfferLists, OfferRequest};
pub use pricing::{MarketMode, PriceAdjuster, price_with_jitter, purchase_cost};
pub use rng::{CountingRng, DrawCounts, RngBundle};
pub use rotation::{CategoryRotator, Rotation, active_category_count, is_rotation_visit};
pub use sampling::sample_without_replacement;
pub use store::{LocationStateStore, MemoryStateStore, active_categories_key, visit_count_key};
pub use visits::{current_visit, next_visit};

/// Trait for abstracting reference data loading.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the item catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<ItemCatalog, Self::Error>;

    /// Load the location directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be loaded or parsed.
    fn load_locations(&self) -> Result<LocationDirectory, Self::Error>;
}

impl<S: LocationStateStore> MarketGenerator<S> {
    /// Build a generator from a data loader.
    ///
    /// # Errors
    ///
    /// Returns an error if reference data cannot be loaded or the config is
    /// invalid.
    pub fn from_loader<L>(
        loader: &L,
        store: S,
        config: MarketConfig,
        seed: u64,
    ) -> Result<Self, anyhow::Error>
    where
        L: DataLoader,
        L::Error: Into<anyhow::Error>,
    {
        let catalog = loader.load_catalog().map_err(Into::into)?;
        let directory = loader.load_locations().map_err(Into::into)?;
        Ok(Self::new(catalog, directory, store, config, seed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<ItemCatalog, Self::Error> {
            Ok(ItemCatalog::from_entries([
                ("Herbs", "Herb", 100),
                ("Herbs", "Root", 80),
                ("Spices", "Pepper", 120),
            ]))
        }

        fn load_locations(&self) -> Result<LocationDirectory, Self::Error> {
            Ok(LocationDirectory::from_locations(vec![Location {
                name: "Kyo".to_string(),
                tier: Tier::City,
                specialty_buy_item: None,
                rarity_sell_item: Some("Pepper".to_string()),
            }])
            .unwrap_or_default())
        }
    }

    #[test]
    fn generator_builds_from_loader() {
        let mut market = MarketGenerator::from_loader(
            &FixtureLoader,
            MemoryStateStore::new(),
            MarketConfig::default(),
            0xABCD,
        )
        .unwrap();
        let snapshot = market.generate("Kyo", MarketMode::Normal).unwrap();
        assert_eq!(snapshot.tier, Tier::City);
        assert_eq!(snapshot.active_categories.len(), 2);
        assert_eq!(snapshot.sell_list[0].item_name, "Pepper");
        assert_eq!(snapshot.buy_list.len(), 3);
    }

    #[test]
    fn from_loader_surfaces_config_errors() {
        let cfg = MarketConfig {
            rotation_cadence: 0,
            ..MarketConfig::default()
        };
        let err = MarketGenerator::from_loader(&FixtureLoader, MemoryStateStore::new(), cfg, 1)
            .unwrap_err();
        assert!(err.to_string().contains("rotation cadence"));
    }
}
