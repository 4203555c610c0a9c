use std::fs;
use std::path::PathBuf;

use peddler_game::{CatalogError, DataLoader, ItemCatalog, LocationDirectory, LocationError};
use thiserror::Error;

const DEFAULT_ITEMS: &str = include_str!("../assets/data/items.json");
const DEFAULT_LOCATIONS: &str = include_str!("../assets/data/locations.json");

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Locations(#[from] LocationError),
}

/// Reference data from optional override files, falling back to the data
/// embedded in the binary.
#[derive(Debug, Clone, Default)]
pub struct FileDataLoader {
    items: Option<PathBuf>,
    locations: Option<PathBuf>,
}

impl FileDataLoader {
    #[must_use]
    pub const fn new(items: Option<PathBuf>, locations: Option<PathBuf>) -> Self {
        Self { items, locations }
    }

    fn read_or(path: Option<&PathBuf>, fallback: &str) -> Result<String, DataError> {
        path.map_or_else(
            || Ok(fallback.to_string()),
            |path| {
                fs::read_to_string(path).map_err(|source| DataError::Io {
                    path: path.clone(),
                    source,
                })
            },
        )
    }
}

impl DataLoader for FileDataLoader {
    type Error = DataError;

    fn load_catalog(&self) -> Result<ItemCatalog, Self::Error> {
        let raw = Self::read_or(self.items.as_ref(), DEFAULT_ITEMS)?;
        Ok(ItemCatalog::from_json(&raw)?)
    }

    fn load_locations(&self) -> Result<LocationDirectory, Self::Error> {
        let raw = Self::read_or(self.locations.as_ref(), DEFAULT_LOCATIONS)?;
        Ok(LocationDirectory::from_json(&raw)?)
    }
}
