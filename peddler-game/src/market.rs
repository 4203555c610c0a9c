//! Market generation facade: one call per logical visit.

use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::config::{ConfigError, MarketConfig};
use crate::location::{Location, LocationDirectory, Tier};
use crate::offers::{OfferEntry, OfferListBuilder, OfferRequest};
use crate::pricing::{MarketMode, PriceAdjuster};
use crate::rng::{DrawCounts, RngBundle};
use crate::rotation::CategoryRotator;
use crate::store::LocationStateStore;
use crate::visits::{current_visit, next_visit};

/// Everything the presentation layer needs to render one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub location: String,
    pub tier: Tier,
    pub mode: MarketMode,
    /// Visit number this snapshot belongs to; black-market passes have none.
    pub visit: Option<u32>,
    pub active_categories: Vec<String>,
    /// Whether the active categories were resampled for this snapshot.
    pub rotated: bool,
    pub buy_list: Vec<OfferEntry>,
    pub sell_list: Vec<OfferEntry>,
    pub specialty_buy_item: Option<String>,
    pub rarity_sell_item: Option<String>,
    /// Random draws this pass consumed from each stream.
    #[serde(default)]
    pub draws: DrawCounts,
}

/// Orchestrates visit counting, rotation and offer building over an injected
/// state store.
#[derive(Debug)]
pub struct MarketGenerator<S: LocationStateStore> {
    catalog: ItemCatalog,
    directory: LocationDirectory,
    store: S,
    config: MarketConfig,
    rotator: CategoryRotator,
    adjuster: PriceAdjuster,
    rng: RngBundle,
}

impl<S: LocationStateStore> MarketGenerator<S> {
    /// Create a generator over validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        catalog: ItemCatalog,
        directory: LocationDirectory,
        store: S,
        config: MarketConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rotator: CategoryRotator::new(config.rotation_cadence),
            adjuster: PriceAdjuster::from_config(&config),
            rng: RngBundle::from_user_seed(seed),
            catalog,
            directory,
            store,
            config,
        })
    }

    /// Produce the market for one logical visit.
    ///
    /// Normal mode records exactly one visit for the location, then resolves
    /// the active categories and builds fresh offer lists. Black-market mode
    /// leaves the visit counter and the rotation untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if updated rotation state cannot be persisted.
    pub fn generate(&mut self, location: &str, mode: MarketMode) -> Result<MarketSnapshot, S::Error> {
        self.pass(location, mode, true)
    }

    /// Re-render the market for the current visit without consuming a new
    /// one: the active categories stay as persisted, only prices and the
    /// random fill are redrawn. A never-visited location records its first
    /// visit.
    ///
    /// # Errors
    ///
    /// Returns an error if updated rotation state cannot be persisted.
    pub fn refresh(&mut self, location: &str, mode: MarketMode) -> Result<MarketSnapshot, S::Error> {
        self.pass(location, mode, false)
    }

    fn pass(
        &mut self,
        location: &str,
        mode: MarketMode,
        consume_visit: bool,
    ) -> Result<MarketSnapshot, S::Error> {
        let place = self.resolve_location(location);
        let builder = OfferListBuilder::new(&self.catalog, self.adjuster)
            .with_black_market_size(self.config.black_market_size);
        let draws_before = self.rng.draws();

        let (visit, rotation) = if mode.is_black_market() {
            (None, None)
        } else {
            let recorded = current_visit(&self.store, &place.name);
            let pool = self.catalog.categories();
            let mut rotation_rng = self.rng.rotation();
            if consume_visit || recorded == 0 {
                let visit = next_visit(&mut self.store, &place.name)?;
                let rotation = self.rotator.current_categories(
                    &mut self.store,
                    &place.name,
                    place.tier,
                    visit,
                    &pool,
                    &mut *rotation_rng,
                )?;
                (Some(visit), Some(rotation))
            } else {
                let rotation = CategoryRotator::stored_or_sample(
                    &mut self.store,
                    &place.name,
                    place.tier,
                    &pool,
                    &mut *rotation_rng,
                )?;
                (Some(recorded), Some(rotation))
            }
        };

        let active_categories = rotation
            .as_ref()
            .map(|rotation| rotation.categories.clone())
            .unwrap_or_default();
        let request = OfferRequest {
            active_categories: &active_categories,
            tier: place.tier,
            specialty_buy_item: place.specialty_buy_item.as_deref(),
            rarity_sell_item: place.rarity_sell_item.as_deref(),
            mode,
        };
        let lists = builder.build_offers(&request, &mut *self.rng.offers());
        let draws = self.rng.draws().since(draws_before);
        log::trace!(
            "{} {mode} pass: {} buy / {} sell offers ({} rotation / {} offer draws)",
            place.name,
            lists.buy.len(),
            lists.sell.len(),
            draws.rotation,
            draws.offers
        );

        Ok(MarketSnapshot {
            location: place.name,
            tier: place.tier,
            mode,
            visit,
            rotated: rotation.is_some_and(|rotation| rotation.rotated),
            active_categories,
            buy_list: lists.buy,
            sell_list: lists.sell,
            specialty_buy_item: place.specialty_buy_item,
            rarity_sell_item: place.rarity_sell_item,
            draws,
        })
    }

    /// Directory entry for `name`; a blank name selects the configured
    /// fallback location and unknown names get village defaults.
    #[must_use]
    pub fn resolve_location(&self, name: &str) -> Location {
        let name = name.trim();
        if name.is_empty() {
            self.directory.resolve(&self.config.fallback_location)
        } else {
            self.directory.resolve(name)
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    #[must_use]
    pub const fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Pricing rules in effect, including the sell payout contract.
    #[must_use]
    pub const fn adjuster(&self) -> &PriceAdjuster {
        &self.adjuster
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
