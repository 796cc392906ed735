//! Validation and JSON loading for `CureConfig`

use std::path::Path;

use super::types::CureConfig;
use crate::cure::errors::ConfigError;
use crate::cure::types::AssetClass;

impl CureConfig {
    /// Check limits and extension sets
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_fetches == Some(0) {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_asset_bytes == Some(0) {
            return Err(ConfigError::ZeroAssetLimit);
        }
        if self.fetch_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        for class in AssetClass::ALL {
            let set = match class {
                AssetClass::Style => &self.extensions.style,
                AssetClass::Script => &self.extensions.script,
                AssetClass::Image => &self.extensions.image,
            };
            if set.is_empty() {
                return Err(ConfigError::EmptyExtensionSet(class));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed JSON, otherwise whatever `validate`
    /// reports.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file cannot be read, otherwise as `from_json_str`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_json_str(&json)
    }
}
