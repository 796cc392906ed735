//! Core configuration types for curing
//!
//! Everything here is optional: a default `CureConfig` cures with the stock
//! extension sets, unbounded concurrency, no timeout, no size cap and no
//! custom headers.

use serde::{Deserialize, Serialize};

use crate::utils::{DEFAULT_IMAGE_EXTENSIONS, DEFAULT_SCRIPT_EXTENSIONS, DEFAULT_STYLE_EXTENSIONS};

/// Recognized extension patterns per asset class
///
/// Immutable once handed to an orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSets {
    pub style: Vec<String>,
    pub script: Vec<String>,
    pub image: Vec<String>,
}

impl Default for ExtensionSets {
    fn default() -> Self {
        let owned = |set: &[&str]| set.iter().map(|s| (*s).to_string()).collect();
        Self {
            style: owned(DEFAULT_STYLE_EXTENSIONS),
            script: owned(DEFAULT_SCRIPT_EXTENSIONS),
            image: owned(DEFAULT_IMAGE_EXTENSIONS),
        }
    }
}

/// Main configuration struct for curing operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CureConfig {
    pub(crate) extensions: ExtensionSets,

    /// Units in flight per asset class routine. `None` launches every unit
    /// at once.
    pub(crate) max_concurrent_fetches: Option<usize>,

    /// Per-request timeout. `None` lets a hung fetch hang its unit.
    pub(crate) fetch_timeout_secs: Option<u64>,

    /// Largest accepted body, checked while streaming
    pub(crate) max_asset_bytes: Option<usize>,

    pub(crate) user_agent: Option<String>,
}
