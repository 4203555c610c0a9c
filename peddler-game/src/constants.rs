//! Centralized balance and tuning constants for the market generator.
//!
//! Tier tables and jitter bands are fixed here rather than in external data
//! so that pricing and offer sizes can only change through reviewed code.

// Rotation -----------------------------------------------------------------
pub(crate) const DEFAULT_ROTATION_CADENCE: u32 = 5;

// Tier tables --------------------------------------------------------------
pub(crate) const VILLAGE_CATEGORY_COUNT: usize = 1;
pub(crate) const TOWN_CATEGORY_COUNT: usize = 2;
pub(crate) const CITY_CATEGORY_COUNT: usize = 3;
pub(crate) const UNCLASSIFIED_CATEGORY_COUNT: usize = 1;

pub(crate) const VILLAGE_CAPACITY: usize = 5;
pub(crate) const TOWN_CAPACITY: usize = 10;
pub(crate) const CITY_CAPACITY: usize = 20;
pub(crate) const UNCLASSIFIED_CAPACITY: usize = 8;

pub(crate) const VILLAGE_PRICE_MULTIPLIER: f64 = 1.0;
pub(crate) const TOWN_PRICE_MULTIPLIER: f64 = 1.3;
pub(crate) const CITY_PRICE_MULTIPLIER: f64 = 1.6;
pub(crate) const UNCLASSIFIED_PRICE_MULTIPLIER: f64 = 1.0;

// Pricing ------------------------------------------------------------------
pub(crate) const NORMAL_JITTER_MIN: f64 = 0.90;
pub(crate) const NORMAL_JITTER_MAX: f64 = 1.10;
pub(crate) const BLACK_MARKET_JITTER_MIN: f64 = 0.50;
pub(crate) const BLACK_MARKET_JITTER_MAX: f64 = 1.00;
pub(crate) const MIN_OFFER_PRICE: u32 = 1;

// Black market -------------------------------------------------------------
pub(crate) const DEFAULT_BLACK_MARKET_SIZE: usize = 8;
pub(crate) const DEFAULT_BLACK_MARKET_PAYOUT: f64 = 1.5;

// Locations ----------------------------------------------------------------
pub(crate) const DEFAULT_FALLBACK_LOCATION: &str = "Bau";

// Storage keys -------------------------------------------------------------
pub(crate) const VISIT_COUNT_KEY_PREFIX: &str = "visitCount:";
pub(crate) const ACTIVE_CATEGORIES_KEY_PREFIX: &str = "activeCategories:";

// RNG stream domains -------------------------------------------------------
pub(crate) const RNG_DOMAIN_ROTATION: &[u8] = b"peddler.rotation";
pub(crate) const RNG_DOMAIN_OFFERS: &[u8] = b"peddler.offers";
