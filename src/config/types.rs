use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::billing::PriceTable;

/// Settings for one run, built once at startup and passed down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared credentials profile
    pub profile: String,
    /// Region used for bucket discovery and for buckets whose region is unknown
    pub region: String,
    /// Maximum number of buckets collected at once
    pub concurrency: usize,
    /// Show per storage class detail lines
    pub verbose: bool,
    /// Price overrides in USD per GB-month, keyed by storage class
    pub prices: BTreeMap<String, f64>,
}

/// Error types for configuration handling
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access configuration file: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("Configuration file is corrupted: {0}")]
    Corrupted(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Concurrency must be greater than 0")]
    ZeroConcurrency,

    #[error("Region must not be empty")]
    EmptyRegion,

    #[error("Profile must not be empty")]
    EmptyProfile,

    #[error("Invalid price {price} for storage class {class}")]
    InvalidPrice { class: String, price: f64 },
}

impl Config {
    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        if self.profile.trim().is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        if let Some((class, price)) = self
            .prices
            .iter()
            .find(|(_, price)| !price.is_finite() || **price < 0.0)
        {
            return Err(ConfigError::InvalidPrice {
                class: class.clone(),
                price: *price,
            });
        }
        Ok(())
    }

    /// Tokyo prices with the configured overrides applied
    pub fn price_table(&self) -> PriceTable {
        PriceTable::tokyo().with_overrides(&self.prices)
    }
}
