//! Price perturbation for normal and black-market trading.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MarketConfig;
use crate::constants::{
    BLACK_MARKET_JITTER_MAX, BLACK_MARKET_JITTER_MIN, DEFAULT_BLACK_MARKET_PAYOUT,
    MIN_OFFER_PRICE, NORMAL_JITTER_MAX, NORMAL_JITTER_MIN,
};
use crate::location::Tier;
use crate::numbers::{round_f64_to_u32_floored, round_f64_to_u64, u64_to_f64};

/// Which market a generation pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMode {
    #[default]
    Normal,
    BlackMarket,
}

impl MarketMode {
    #[must_use]
    pub const fn from_black_market_flag(black_market: bool) -> Self {
        if black_market {
            Self::BlackMarket
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub const fn is_black_market(self) -> bool {
        matches!(self, Self::BlackMarket)
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::BlackMarket => "black_market",
        }
    }

    /// Half-open `[min, max)` range price jitter is drawn from.
    #[must_use]
    pub const fn jitter_band(self) -> (f64, f64) {
        match self {
            Self::Normal => (NORMAL_JITTER_MIN, NORMAL_JITTER_MAX),
            Self::BlackMarket => (BLACK_MARKET_JITTER_MIN, BLACK_MARKET_JITTER_MAX),
        }
    }
}

impl fmt::Display for MarketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Deterministic price for a given jitter factor.
///
/// Normal mode scales by the tier multiplier; black markets ignore the tier.
/// The result is rounded to the nearest integer and never drops below 1.
#[must_use]
pub fn price_with_jitter(base_price: u32, tier: Tier, mode: MarketMode, jitter: f64) -> u32 {
    let multiplier = match mode {
        MarketMode::Normal => tier.price_multiplier(),
        MarketMode::BlackMarket => 1.0,
    };
    round_f64_to_u32_floored(f64::from(base_price) * multiplier * jitter, MIN_OFFER_PRICE)
}

/// Total cost of buying `quantity` units at `price`.
#[must_use]
pub fn purchase_cost(price: u32, quantity: u32) -> u64 {
    u64::from(price).saturating_mul(u64::from(quantity))
}

/// Computes jittered prices and the sell-side payout contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceAdjuster {
    pinned_jitter: Option<f64>,
    black_market_payout: f64,
}

impl Default for PriceAdjuster {
    fn default() -> Self {
        Self {
            pinned_jitter: None,
            black_market_payout: DEFAULT_BLACK_MARKET_PAYOUT,
        }
    }
}

impl PriceAdjuster {
    #[must_use]
    pub fn from_config(cfg: &MarketConfig) -> Self {
        Self {
            pinned_jitter: cfg.pinned_jitter,
            black_market_payout: cfg.black_market_payout,
        }
    }

    /// Adjuster that always applies `jitter` instead of drawing one.
    #[must_use]
    pub fn pinned(jitter: f64) -> Self {
        Self {
            pinned_jitter: Some(jitter),
            ..Self::default()
        }
    }

    /// Jitter factor for one price, drawn uniformly from the mode's band
    /// unless pinned.
    pub fn draw_jitter<R: Rng + ?Sized>(&self, mode: MarketMode, rng: &mut R) -> f64 {
        self.pinned_jitter.unwrap_or_else(|| {
            let (min, max) = mode.jitter_band();
            rng.gen_range(min..max)
        })
    }

    /// Jittered, tier-scaled price for a catalog entry.
    pub fn adjusted_price<R: Rng + ?Sized>(
        &self,
        base_price: u32,
        tier: Tier,
        mode: MarketMode,
        rng: &mut R,
    ) -> u32 {
        let jitter = self.draw_jitter(mode, rng);
        price_with_jitter(base_price, tier, mode, jitter)
    }

    /// Money received for selling `quantity` units at `price`. Black-market
    /// sales pay out the configured bonus, rounded to the nearest unit.
    #[must_use]
    pub fn sell_payout(&self, price: u32, quantity: u32, mode: MarketMode) -> u64 {
        let total = purchase_cost(price, quantity);
        match mode {
            MarketMode::Normal => total,
            MarketMode::BlackMarket => round_f64_to_u64(u64_to_f64(total) * self.black_market_payout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn unit_jitter_applies_tier_multiplier() {
        for tier in Tier::ALL {
            let expected = (100.0 * tier.price_multiplier()).round();
            let price = price_with_jitter(100, tier, MarketMode::Normal, 1.0);
            assert!((f64::from(price) - expected).abs() < f64::EPSILON, "{tier}");
        }
        assert_eq!(price_with_jitter(100, Tier::City, MarketMode::Normal, 1.0), 160);
        assert_eq!(price_with_jitter(50, Tier::Town, MarketMode::Normal, 1.0), 65);
    }

    #[test]
    fn black_market_ignores_tier() {
        assert_eq!(
            price_with_jitter(200, Tier::City, MarketMode::BlackMarket, 0.5),
            100
        );
        assert_eq!(
            price_with_jitter(200, Tier::Village, MarketMode::BlackMarket, 0.5),
            100
        );
    }

    #[test]
    fn prices_never_fall_below_one() {
        let mut rng = SmallRng::seed_from_u64(17);
        let adjuster = PriceAdjuster::default();
        for _ in 0..500 {
            assert!(adjuster.adjusted_price(1, Tier::Village, MarketMode::BlackMarket, &mut rng) >= 1);
        }
        assert_eq!(price_with_jitter(1, Tier::Village, MarketMode::BlackMarket, 0.0), 1);
    }

    #[test]
    fn drawn_prices_stay_in_band() {
        let mut rng = SmallRng::seed_from_u64(4);
        let adjuster = PriceAdjuster::default();
        for _ in 0..500 {
            let normal = adjuster.adjusted_price(1_000, Tier::Town, MarketMode::Normal, &mut rng);
            assert!((1_170..=1_430).contains(&normal), "normal {normal}");
            let black = adjuster.adjusted_price(1_000, Tier::Town, MarketMode::BlackMarket, &mut rng);
            assert!((500..=1_000).contains(&black), "black {black}");
        }
    }

    #[test]
    fn pinned_jitter_skips_rng() {
        let mut rng = SmallRng::seed_from_u64(1);
        let adjuster = PriceAdjuster::pinned(1.0);
        assert_eq!(
            adjuster.adjusted_price(80, Tier::Village, MarketMode::Normal, &mut rng),
            80
        );
    }

    #[test]
    fn black_market_sales_pay_bonus() {
        let adjuster = PriceAdjuster::default();
        assert_eq!(purchase_cost(33, 3), 99);
        assert_eq!(adjuster.sell_payout(33, 3, MarketMode::Normal), 99);
        assert_eq!(adjuster.sell_payout(33, 3, MarketMode::BlackMarket), 149);
        assert_eq!(adjuster.sell_payout(33, 0, MarketMode::BlackMarket), 0);
    }
}
