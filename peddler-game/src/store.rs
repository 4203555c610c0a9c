//! Persisted per-location rotation state.
use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::constants::{ACTIVE_CATEGORIES_KEY_PREFIX, VISIT_COUNT_KEY_PREFIX};

/// Storage key for a location's visit counter.
#[must_use]
pub fn visit_count_key(location: &str) -> String {
    format!("{VISIT_COUNT_KEY_PREFIX}{location}")
}

/// Storage key for a location's active category list.
#[must_use]
pub fn active_categories_key(location: &str) -> String {
    format!("{ACTIVE_CATEGORIES_KEY_PREFIX}{location}")
}

/// Trait for abstracting rotation state persistence.
/// Platform-specific implementations should provide this.
///
/// `None` from a getter means "no prior state"; callers treat read errors the
/// same way.
pub trait LocationStateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the visit count recorded for a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn visit_count(&self, location: &str) -> Result<Option<u32>, Self::Error>;

    /// Persist the visit count for a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_visit_count(&mut self, location: &str, count: u32) -> Result<(), Self::Error>;

    /// Read the active categories recorded for a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn active_categories(&self, location: &str) -> Result<Option<Vec<String>>, Self::Error>;

    /// Persist the active categories for a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_active_categories(
        &mut self,
        location: &str,
        categories: &[String],
    ) -> Result<(), Self::Error>;
}

impl<S: LocationStateStore + ?Sized> LocationStateStore for &mut S {
    type Error = S::Error;

    fn visit_count(&self, location: &str) -> Result<Option<u32>, Self::Error> {
        (**self).visit_count(location)
    }

    fn set_visit_count(&mut self, location: &str, count: u32) -> Result<(), Self::Error> {
        (**self).set_visit_count(location, count)
    }

    fn active_categories(&self, location: &str) -> Result<Option<Vec<String>>, Self::Error> {
        (**self).active_categories(location)
    }

    fn set_active_categories(
        &mut self,
        location: &str,
        categories: &[String],
    ) -> Result<(), Self::Error> {
        (**self).set_active_categories(location, categories)
    }
}

/// In-memory store, keyed by location name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStateStore {
    visits: BTreeMap<String, u32>,
    categories: BTreeMap<String, Vec<String>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded for one location.
    pub fn clear_location(&mut self, location: &str) {
        self.visits.remove(location);
        self.categories.remove(location);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty() && self.categories.is_empty()
    }
}

impl LocationStateStore for MemoryStateStore {
    type Error = Infallible;

    fn visit_count(&self, location: &str) -> Result<Option<u32>, Self::Error> {
        Ok(self.visits.get(location).copied())
    }

    fn set_visit_count(&mut self, location: &str, count: u32) -> Result<(), Self::Error> {
        self.visits.insert(location.to_string(), count);
        Ok(())
    }

    fn active_categories(&self, location: &str) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self.categories.get(location).cloned())
    }

    fn set_active_categories(
        &mut self,
        location: &str,
        categories: &[String],
    ) -> Result<(), Self::Error> {
        self.categories
            .insert(location.to_string(), categories.to_vec());
        Ok(())
    }
}
