//! Buy and sell offer list construction.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{Item, ItemCatalog};
use crate::constants::DEFAULT_BLACK_MARKET_SIZE;
use crate::location::Tier;
use crate::pricing::{MarketMode, PriceAdjuster};
use crate::sampling::sample_without_replacement;

/// One priced line in an offer list. Recomputed on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferEntry {
    pub item_name: String,
    pub price: u32,
    pub category: String,
}

/// Buy and sell lists produced by one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLists {
    pub buy: Vec<OfferEntry>,
    pub sell: Vec<OfferEntry>,
}

/// Inputs for a single pass.
#[derive(Debug, Clone, Copy)]
pub struct OfferRequest<'a> {
    pub active_categories: &'a [String],
    pub tier: Tier,
    pub specialty_buy_item: Option<&'a str>,
    pub rarity_sell_item: Option<&'a str>,
    pub mode: MarketMode,
}

#[derive(Debug, Clone, Copy)]
pub struct OfferListBuilder<'a> {
    catalog: &'a ItemCatalog,
    adjuster: PriceAdjuster,
    black_market_size: usize,
}

impl<'a> OfferListBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a ItemCatalog, adjuster: PriceAdjuster) -> Self {
        Self {
            catalog,
            adjuster,
            black_market_size: DEFAULT_BLACK_MARKET_SIZE,
        }
    }

    #[must_use]
    pub const fn with_black_market_size(mut self, size: usize) -> Self {
        self.black_market_size = size;
        self
    }

    /// Build both offer lists for one pass.
    ///
    /// Normal mode draws from the active categories, capped by the tier
    /// capacity, with the location's specialty (buy) and rarity (sell) items
    /// pinned to the front of their lists whatever categories are active.
    /// Black-market mode ignores categories and special items and draws two
    /// independent samples from the whole catalog.
    pub fn build_offers<R: Rng + ?Sized>(&self, request: &OfferRequest<'_>, rng: &mut R) -> OfferLists {
        match request.mode {
            MarketMode::Normal => self.build_normal(request, rng),
            MarketMode::BlackMarket => self.build_black_market(request.tier, rng),
        }
    }

    fn build_normal<R: Rng + ?Sized>(&self, request: &OfferRequest<'_>, rng: &mut R) -> OfferLists {
        let tier = request.tier;
        let mut seen = HashSet::new();
        let candidates: Vec<OfferEntry> = request
            .active_categories
            .iter()
            .filter(|category| seen.insert(*category))
            .flat_map(|category| self.catalog.items_in(category))
            .map(|item| self.price_item(item, tier, MarketMode::Normal, rng))
            .collect();

        let capacity = tier.capacity();
        OfferLists {
            buy: self.fill_list(&candidates, request.specialty_buy_item, capacity, tier, rng),
            sell: self.fill_list(&candidates, request.rarity_sell_item, capacity, tier, rng),
        }
    }

    fn fill_list<R: Rng + ?Sized>(
        &self,
        candidates: &[OfferEntry],
        special: Option<&str>,
        capacity: usize,
        tier: Tier,
        rng: &mut R,
    ) -> Vec<OfferEntry> {
        if capacity == 0 {
            return Vec::new();
        }
        let guaranteed = special
            .and_then(|name| self.catalog.find_item(name))
            .map(|item| self.price_item(item, tier, MarketMode::Normal, rng));

        let Some(entry) = guaranteed else {
            return sample_without_replacement(candidates, capacity, rng);
        };
        let pool: Vec<OfferEntry> = candidates
            .iter()
            .filter(|candidate| candidate.item_name != entry.item_name)
            .cloned()
            .collect();
        let mut list = Vec::with_capacity(capacity);
        list.push(entry);
        list.extend(sample_without_replacement(&pool, capacity - 1, rng));
        list
    }

    fn build_black_market<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> OfferLists {
        let priced: Vec<OfferEntry> = self
            .catalog
            .items()
            .map(|item| self.price_item(item, tier, MarketMode::BlackMarket, rng))
            .collect();
        OfferLists {
            buy: sample_without_replacement(&priced, self.black_market_size, rng),
            sell: sample_without_replacement(&priced, self.black_market_size, rng),
        }
    }

    fn price_item<R: Rng + ?Sized>(
        &self,
        item: Item,
        tier: Tier,
        mode: MarketMode,
        rng: &mut R,
    ) -> OfferEntry {
        let price = self.adjuster.adjusted_price(item.base_price, tier, mode, rng);
        OfferEntry {
            item_name: item.name,
            price,
            category: item.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_entries([
            ("Herbs", "Herb", 100),
            ("Herbs", "Root", 80),
            ("Herbs", "Moss", 20),
            ("Metal", "Iron", 150),
            ("Metal", "Copper", 90),
            ("Gems", "Pearl", 900),
        ])
    }

    fn herbs() -> Vec<String> {
        vec!["Herbs".to_string()]
    }

    #[test]
    fn specialty_sourced_outside_active_categories() {
        let catalog = catalog();
        let builder = OfferListBuilder::new(&catalog, PriceAdjuster::pinned(1.0));
        let active = vec!["Metal".to_string()];
        let request = OfferRequest {
            active_categories: &active,
            tier: Tier::Village,
            specialty_buy_item: Some("Pearl"),
            rarity_sell_item: Some("Herb"),
            mode: MarketMode::Normal,
        };
        let mut rng = SmallRng::seed_from_u64(9);
        let lists = builder.build_offers(&request, &mut rng);
        assert_eq!(lists.buy[0].item_name, "Pearl");
        assert_eq!(lists.buy[0].price, 900);
        assert_eq!(lists.buy.len(), 3);
        assert_eq!(lists.sell[0].item_name, "Herb");
        assert!(lists.sell[1..].iter().all(|entry| entry.category == "Metal"));
    }

    #[test]
    fn special_item_not_duplicated_in_fill() {
        let catalog = catalog();
        let builder = OfferListBuilder::new(&catalog, PriceAdjuster::default());
        let active = herbs();
        let request = OfferRequest {
            active_categories: &active,
            tier: Tier::Village,
            specialty_buy_item: Some("Herb"),
            rarity_sell_item: None,
            mode: MarketMode::Normal,
        };
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let lists = builder.build_offers(&request, &mut rng);
            let herb_count = lists.buy.iter().filter(|e| e.item_name == "Herb").count();
            assert_eq!(herb_count, 1);
            assert_eq!(lists.buy.len(), 3);
            assert_eq!(lists.sell.len(), 3);
        }
    }

    #[test]
    fn unknown_special_item_leaves_full_sample() {
        let catalog = catalog();
        let builder = OfferListBuilder::new(&catalog, PriceAdjuster::default());
        let active = vec!["Herbs".to_string(), "Metal".to_string()];
        let request = OfferRequest {
            active_categories: &active,
            tier: Tier::Village,
            specialty_buy_item: Some("Unobtainium"),
            rarity_sell_item: None,
            mode: MarketMode::Normal,
        };
        let mut rng = SmallRng::seed_from_u64(12);
        let lists = builder.build_offers(&request, &mut rng);
        assert_eq!(lists.buy.len(), 5);
        assert!(lists.buy.iter().all(|e| e.item_name != "Unobtainium"));
    }

    #[test]
    fn black_market_ignores_categories_and_specials() {
        let catalog = catalog();
        let builder =
            OfferListBuilder::new(&catalog, PriceAdjuster::default()).with_black_market_size(4);
        let active = herbs();
        let request = OfferRequest {
            active_categories: &active,
            tier: Tier::City,
            specialty_buy_item: Some("Herb"),
            rarity_sell_item: Some("Herb"),
            mode: MarketMode::BlackMarket,
        };
        let mut rng = SmallRng::seed_from_u64(31);
        let lists = builder.build_offers(&request, &mut rng);
        assert_eq!(lists.buy.len(), 4);
        assert_eq!(lists.sell.len(), 4);
        for entry in lists.buy.iter().chain(&lists.sell) {
            let base = catalog.find_item(&entry.item_name).unwrap().base_price;
            assert!(entry.price <= base && entry.price * 2 >= base);
        }
    }

    #[test]
    fn empty_catalog_yields_empty_lists() {
        let catalog = ItemCatalog::empty();
        let builder = OfferListBuilder::new(&catalog, PriceAdjuster::default());
        let mut rng = SmallRng::seed_from_u64(0);
        for mode in [MarketMode::Normal, MarketMode::BlackMarket] {
            let request = OfferRequest {
                active_categories: &[],
                tier: Tier::Town,
                specialty_buy_item: Some("Herb"),
                rarity_sell_item: None,
                mode,
            };
            assert_eq!(builder.build_offers(&request, &mut rng), OfferLists::default());
        }
    }
}
