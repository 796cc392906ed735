//! Fluent builder for `CureConfig`
//!
//! Setters live in `methods.rs`; `build` validates the assembled values.

use super::types::{CureConfig, ExtensionSets};
use crate::cure::errors::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct CureConfigBuilder {
    pub(crate) extensions: ExtensionSets,
    pub(crate) max_concurrent_fetches: Option<usize>,
    pub(crate) fetch_timeout_secs: Option<u64>,
    pub(crate) max_asset_bytes: Option<usize>,
    pub(crate) user_agent: Option<String>,
}

impl CureConfig {
    /// Create a builder for configuring a `CureConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CureConfigBuilder {
        CureConfigBuilder::default()
    }
}

impl CureConfigBuilder {
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero limit or an empty extension set.
    pub fn build(self) -> Result<CureConfig, ConfigError> {
        let config = CureConfig {
            extensions: self.extensions,
            max_concurrent_fetches: self.max_concurrent_fetches,
            fetch_timeout_secs: self.fetch_timeout_secs,
            max_asset_bytes: self.max_asset_bytes,
            user_agent: self.user_agent,
        };
        config.validate()?;
        Ok(config)
    }
}
