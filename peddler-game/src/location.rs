//! Location reference data and the per-tier tables.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::constants::{
    CITY_CAPACITY, CITY_CATEGORY_COUNT, CITY_PRICE_MULTIPLIER, TOWN_CAPACITY, TOWN_CATEGORY_COUNT,
    TOWN_PRICE_MULTIPLIER, UNCLASSIFIED_CAPACITY, UNCLASSIFIED_CATEGORY_COUNT,
    UNCLASSIFIED_PRICE_MULTIPLIER, VILLAGE_CAPACITY, VILLAGE_CATEGORY_COUNT,
    VILLAGE_PRICE_MULTIPLIER,
};

/// Location size classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    #[default]
    Village,
    Town,
    City,
    /// Any tier label the data does not recognise.
    Unclassified,
}

impl Tier {
    pub const ALL: [Self; 4] = [Self::Village, Self::Town, Self::City, Self::Unclassified];

    /// Parse a tier label. Accepts English names in any case and the
    /// kanji labels (村, 町, 市) printed on the board game's location sheets.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "村" => Self::Village,
            "町" => Self::Town,
            "市" => Self::City,
            other => match other.to_ascii_lowercase().as_str() {
                "village" => Self::Village,
                "town" => Self::Town,
                "city" => Self::City,
                _ => Self::Unclassified,
            },
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Village => "village",
            Self::Town => "town",
            Self::City => "city",
            Self::Unclassified => "unclassified",
        }
    }

    /// Number of categories active at once for this tier.
    #[must_use]
    pub const fn category_count(self) -> usize {
        match self {
            Self::Village => VILLAGE_CATEGORY_COUNT,
            Self::Town => TOWN_CATEGORY_COUNT,
            Self::City => CITY_CATEGORY_COUNT,
            Self::Unclassified => UNCLASSIFIED_CATEGORY_COUNT,
        }
    }

    /// Maximum length of each offer list.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Village => VILLAGE_CAPACITY,
            Self::Town => TOWN_CAPACITY,
            Self::City => CITY_CAPACITY,
            Self::Unclassified => UNCLASSIFIED_CAPACITY,
        }
    }

    /// Normal-mode price multiplier.
    #[must_use]
    pub const fn price_multiplier(self) -> f64 {
        match self {
            Self::Village => VILLAGE_PRICE_MULTIPLIER,
            Self::Town => TOWN_PRICE_MULTIPLIER,
            Self::City => CITY_PRICE_MULTIPLIER,
            Self::Unclassified => UNCLASSIFIED_PRICE_MULTIPLIER,
        }
    }
}

impl From<String> for Tier {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.key().to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A market location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "locationName", alias = "name", alias = "地名")]
    pub name: String,
    #[serde(default, alias = "分類")]
    pub tier: Tier,
    #[serde(default, alias = "特産品", skip_serializing_if = "Option::is_none")]
    pub specialty_buy_item: Option<String>,
    #[serde(default, alias = "希少品", skip_serializing_if = "Option::is_none")]
    pub rarity_sell_item: Option<String>,
}

impl Location {
    /// Stand-in for a location missing from the directory: a village with no
    /// special items.
    #[must_use]
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tier: Tier::Village,
            specialty_buy_item: None,
            rarity_sell_item: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("location {0} is listed more than once")]
    DuplicateLocation(String),
}

/// Ordered list of known locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationDirectory(Vec<Location>);

impl LocationDirectory {
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Load the directory from a JSON array of location records.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a location name repeats.
    pub fn from_json(json: &str) -> Result<Self, LocationError> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        Self::from_locations(locations)
    }

    /// # Errors
    ///
    /// Returns an error if a location name repeats.
    pub fn from_locations(locations: Vec<Location>) -> Result<Self, LocationError> {
        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.name.as_str()) {
                return Err(LocationError::DuplicateLocation(location.name.clone()));
            }
        }
        Ok(Self(locations))
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Location> {
        self.0.iter().find(|location| location.name == name)
    }

    /// Look up a location, falling back to an unadorned village.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Location {
        if let Some(location) = self.lookup(name) {
            location.clone()
        } else {
            log::warn!("unknown location {name}; using village defaults");
            Location::fallback(name)
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocationDirectory {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_tables_match_design() {
        let table: Vec<(Tier, usize, usize)> = Tier::ALL
            .iter()
            .map(|tier| (*tier, tier.category_count(), tier.capacity()))
            .collect();
        assert_eq!(
            table,
            vec![
                (Tier::Village, 1, 5),
                (Tier::Town, 2, 10),
                (Tier::City, 3, 20),
                (Tier::Unclassified, 1, 8),
            ]
        );
        assert!((Tier::Town.price_multiplier() - 1.3).abs() < f64::EPSILON);
        assert!((Tier::City.price_multiplier() - 1.6).abs() < f64::EPSILON);
    }

    #[test]
    fn tier_parses_both_label_styles() {
        assert_eq!(Tier::parse("村"), Tier::Village);
        assert_eq!(Tier::parse("町"), Tier::Town);
        assert_eq!(Tier::parse("市"), Tier::City);
        assert_eq!(Tier::parse("CITY"), Tier::City);
        assert_eq!(Tier::parse("hamlet"), Tier::Unclassified);
    }

    #[test]
    fn directory_accepts_source_keys() {
        let json = r#"[
            { "locationName": "Bau", "tier": "village", "specialtyBuyItem": "Herb" },
            { "地名": "ミナト", "分類": "町", "希少品": "Pearl" }
        ]"#;
        let directory = LocationDirectory::from_json(json).unwrap();
        assert_eq!(directory.len(), 2);
        let bau = directory.lookup("Bau").unwrap();
        assert_eq!(bau.specialty_buy_item.as_deref(), Some("Herb"));
        assert!(bau.rarity_sell_item.is_none());
        let port = directory.lookup("ミナト").unwrap();
        assert_eq!(port.tier, Tier::Town);
        assert_eq!(port.rarity_sell_item.as_deref(), Some("Pearl"));
    }

    #[test]
    fn duplicate_locations_rejected() {
        let json = r#"[{ "locationName": "Bau" }, { "locationName": "Bau" }]"#;
        let err = LocationDirectory::from_json(json).unwrap_err();
        assert!(matches!(err, LocationError::DuplicateLocation(name) if name == "Bau"));
    }

    #[test]
    fn resolve_falls_back_to_village() {
        let directory = LocationDirectory::empty();
        let location = directory.resolve("Nowhere");
        assert_eq!(location.tier, Tier::Village);
        assert!(location.specialty_buy_item.is_none());
    }
}
