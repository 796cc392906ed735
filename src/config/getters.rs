//! Getter methods for `CureConfig`

use std::time::Duration;

use super::types::{CureConfig, ExtensionSets};

impl CureConfig {
    #[must_use]
    pub fn extensions(&self) -> &ExtensionSets {
        &self.extensions
    }

    #[must_use]
    pub fn max_concurrent_fetches(&self) -> Option<usize> {
        self.max_concurrent_fetches
    }

    #[must_use]
    pub fn fetch_timeout_secs(&self) -> Option<u64> {
        self.fetch_timeout_secs
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn max_asset_bytes(&self) -> Option<usize> {
        self.max_asset_bytes
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
