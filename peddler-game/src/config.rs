//! Tunable market configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BLACK_MARKET_JITTER_MIN, DEFAULT_BLACK_MARKET_PAYOUT, DEFAULT_BLACK_MARKET_SIZE,
    DEFAULT_FALLBACK_LOCATION, DEFAULT_ROTATION_CADENCE, NORMAL_JITTER_MAX,
};

/// Errors raised when market configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rotation cadence must be at least 1 (got {0})")]
    CadenceTooSmall(u32),
    #[error("pinned jitter must be between {min:.2} and {max:.2} (got {value:.2})")]
    JitterOutOfRange { min: f64, max: f64, value: f64 },
    #[error("black market payout must be at least 1.00 (got {0:.2})")]
    PayoutTooSmall(f64),
    #[error("config JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Market generation settings. Every field has a default, so a partial JSON
/// object (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Visits an active category set stays fixed before it is resampled.
    #[serde(default = "MarketConfig::default_rotation_cadence")]
    pub rotation_cadence: u32,
    /// Length of each black-market list.
    #[serde(default = "MarketConfig::default_black_market_size")]
    pub black_market_size: usize,
    /// Payout multiplier applied when selling on the black market.
    #[serde(default = "MarketConfig::default_black_market_payout")]
    pub black_market_payout: f64,
    /// Location used when the caller names none.
    #[serde(default = "MarketConfig::default_fallback_location")]
    pub fallback_location: String,
    /// Fixed price jitter instead of a random draw.
    #[serde(default)]
    pub pinned_jitter: Option<f64>,
}

impl MarketConfig {
    const fn default_rotation_cadence() -> u32 {
        DEFAULT_ROTATION_CADENCE
    }

    const fn default_black_market_size() -> usize {
        DEFAULT_BLACK_MARKET_SIZE
    }

    const fn default_black_market_payout() -> f64 {
        DEFAULT_BLACK_MARKET_PAYOUT
    }

    fn default_fallback_location() -> String {
        DEFAULT_FALLBACK_LOCATION.to_string()
    }

    /// Parse and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_cadence == 0 {
            return Err(ConfigError::CadenceTooSmall(self.rotation_cadence));
        }
        if let Some(value) = self.pinned_jitter
            && !(BLACK_MARKET_JITTER_MIN..=NORMAL_JITTER_MAX).contains(&value)
        {
            return Err(ConfigError::JitterOutOfRange {
                min: BLACK_MARKET_JITTER_MIN,
                max: NORMAL_JITTER_MAX,
                value,
            });
        }
        if self.black_market_payout.is_nan() || self.black_market_payout < 1.0 {
            return Err(ConfigError::PayoutTooSmall(self.black_market_payout));
        }
        Ok(())
    }

    /// Builder-style override for the pinned jitter.
    #[must_use]
    pub fn with_pinned_jitter(mut self, jitter: f64) -> Self {
        self.pinned_jitter = Some(jitter);
        self
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            rotation_cadence: Self::default_rotation_cadence(),
            black_market_size: Self::default_black_market_size(),
            black_market_payout: Self::default_black_market_payout(),
            fallback_location: Self::default_fallback_location(),
            pinned_jitter: None,
        }
    }
}
