//! JSON key-value file backing for rotation state.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use peddler_game::{LocationStateStore, active_categories_key, visit_count_key};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state value for {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Flat key-value store written back to disk after every update.
///
/// Keys follow the library's `visitCount:<place>` / `activeCategories:<place>`
/// scheme, so the file can be inspected or edited by hand.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Store that never touches the filesystem.
    #[must_use]
    pub const fn ephemeral() -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
        }
    }

    /// Open the state file at `path`. A missing or unreadable file starts
    /// from empty state.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path).unwrap_or_default();
        Self {
            path: Some(path),
            entries,
        }
    }

    fn load_entries(path: &Path) -> Option<BTreeMap<String, Value>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("ignoring unreadable state file {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Some(entries),
            Err(err) => {
                log::warn!("ignoring corrupt state file {}: {err}", path.display());
                None
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FileStoreError> {
        self.entries
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|source| FileStoreError::Json {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Entries only change when the file write succeeds.
    fn write(&mut self, key: String, value: Value) -> Result<(), FileStoreError> {
        let previous = self.entries.insert(key.clone(), value);
        if let Err(err) = self.save() {
            match previous {
                Some(previous) => self.entries.insert(key, previous),
                None => self.entries.remove(&key),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Flush the current entries to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<(), FileStoreError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let body = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            FileStoreError::Json {
                key: path.display().to_string(),
                source,
            }
        })?;
        fs::write(path, body).map_err(|source| FileStoreError::Io {
            path: path.clone(),
            source,
        })
    }
}

impl LocationStateStore for JsonFileStore {
    type Error = FileStoreError;

    fn visit_count(&self, location: &str) -> Result<Option<u32>, Self::Error> {
        self.read(&visit_count_key(location))
    }

    fn set_visit_count(&mut self, location: &str, count: u32) -> Result<(), Self::Error> {
        self.write(visit_count_key(location), Value::from(count))
    }

    fn active_categories(&self, location: &str) -> Result<Option<Vec<String>>, Self::Error> {
        self.read(&active_categories_key(location))
    }

    fn set_active_categories(
        &mut self,
        location: &str,
        categories: &[String],
    ) -> Result<(), Self::Error> {
        self.write(active_categories_key(location), Value::from(categories.to_vec()))
    }
}
