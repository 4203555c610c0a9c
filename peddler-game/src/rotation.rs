//! Category rotation: which categories a location stocks, and when that
//! selection is resampled.
//!
//! The active set is drawn on visit 1 and then every `cadence` visits after
//! it (1, 6, 11, ... for a cadence of 5). Between those visits the persisted
//! set is returned unchanged. Sets always hold distinct categories and are
//! sized by the location tier, capped at the pool size.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::DEFAULT_ROTATION_CADENCE;
use crate::location::Tier;
use crate::sampling::sample_without_replacement;
use crate::store::LocationStateStore;

/// Outcome of a rotation lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub categories: Vec<String>,
    /// Whether the set was freshly sampled on this visit.
    pub rotated: bool,
}

/// Whether `visit` falls on a rotation boundary.
#[must_use]
pub const fn is_rotation_visit(visit: u32, cadence: u32) -> bool {
    cadence <= 1 || visit % cadence == 1
}

/// Number of categories a tier activates given the size of the pool.
#[must_use]
pub fn active_category_count(tier: Tier, pool_size: usize) -> usize {
    tier.category_count().min(pool_size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRotator {
    cadence: u32,
}

impl Default for CategoryRotator {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_CADENCE)
    }
}

impl CategoryRotator {
    #[must_use]
    pub fn new(cadence: u32) -> Self {
        Self {
            cadence: cadence.max(1),
        }
    }

    #[must_use]
    pub const fn cadence(&self) -> u32 {
        self.cadence
    }

    /// Active categories for `location` on a newly counted `visit`. Rotation
    /// visits always resample; other visits reuse the persisted set when it
    /// is still usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a freshly sampled set cannot be persisted.
    pub fn current_categories<S, R>(
        &self,
        store: &mut S,
        location: &str,
        tier: Tier,
        visit: u32,
        pool: &[String],
        rng: &mut R,
    ) -> Result<Rotation, S::Error>
    where
        S: LocationStateStore + ?Sized,
        R: Rng + ?Sized,
    {
        if is_rotation_visit(visit, self.cadence) {
            let categories = Self::resample(store, location, tier, pool, rng)?;
            log::debug!(
                "rotated {location} ({tier}) on visit {visit}: {}",
                categories.join(", ")
            );
            return Ok(Rotation {
                categories,
                rotated: true,
            });
        }
        Self::stored_or_sample(store, location, tier, pool, rng)
    }

    /// Active categories for a pass that does not count a visit: the
    /// persisted set when it is still usable, otherwise a fresh sample.
    /// The cadence is never consulted, so repeated calls are stable.
    ///
    /// # Errors
    ///
    /// Returns an error if a freshly sampled set cannot be persisted.
    pub fn stored_or_sample<S, R>(
        store: &mut S,
        location: &str,
        tier: Tier,
        pool: &[String],
        rng: &mut R,
    ) -> Result<Rotation, S::Error>
    where
        S: LocationStateStore + ?Sized,
        R: Rng + ?Sized,
    {
        let expected = active_category_count(tier, pool.len());
        if let Some(categories) = Self::prior_categories(&*store, location, expected, pool) {
            return Ok(Rotation {
                categories,
                rotated: false,
            });
        }
        let categories = Self::resample(store, location, tier, pool, rng)?;
        log::debug!(
            "sampled {location} ({tier}) without usable stored set: {}",
            categories.join(", ")
        );
        Ok(Rotation {
            categories,
            rotated: true,
        })
    }

    fn resample<S, R>(
        store: &mut S,
        location: &str,
        tier: Tier,
        pool: &[String],
        rng: &mut R,
    ) -> Result<Vec<String>, S::Error>
    where
        S: LocationStateStore + ?Sized,
        R: Rng + ?Sized,
    {
        let expected = active_category_count(tier, pool.len());
        let categories = sample_without_replacement(pool, expected, rng);
        store.set_active_categories(location, &categories)?;
        Ok(categories)
    }

    /// Persisted set for a location if it is still consistent with the tier
    /// and the pool; anything else counts as "no prior state".
    fn prior_categories<S>(
        store: &S,
        location: &str,
        expected: usize,
        pool: &[String],
    ) -> Option<Vec<String>>
    where
        S: LocationStateStore + ?Sized,
    {
        let stored = match store.active_categories(location) {
            Ok(stored) => stored?,
            Err(err) => {
                log::warn!("active categories for {location} unreadable: {err}");
                return None;
            }
        };
        if stored.is_empty() && expected > 0 {
            return None;
        }
        let distinct: HashSet<&String> = stored.iter().collect();
        let consistent = stored.len() == expected
            && distinct.len() == stored.len()
            && stored.iter().all(|category| pool.contains(category));
        if consistent {
            Some(stored)
        } else {
            log::warn!(
                "stored categories for {location} no longer fit (expected {expected}, got {stored:?}); resampling"
            );
            None
        }
    }
}
