use super::types::Config;
use crate::core::DEFAULT_CONCURRENCY;
use std::collections::BTreeMap;

pub const DEFAULT_PROFILE: &str = "default";

/// Asia Pacific (Tokyo), matching the default price table
pub const DEFAULT_REGION: &str = "ap-northeast-1";

impl Default for Config {
    fn default() -> Self {
        Config {
            profile: DEFAULT_PROFILE.to_string(),
            region: DEFAULT_REGION.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            verbose: false,
            prices: BTreeMap::new(),
        }
    }
}
