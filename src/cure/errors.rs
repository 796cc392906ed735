//! Error types for curing operations
//!
//! Two families live here. `CureError` is fatal to a whole `cure()` call.
//! `AssetError` (and the `FetchError` it wraps) only ends the unit of work for
//! one element; those are reported through a `FailureReporter` and never
//! surface as the result of `cure()`.

/// Result type alias for orchestrator operations
pub type CureResult<T> = Result<T, CureError>;

/// Errors that abort a cure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CureError {
    /// `cure()` called before `configure()`, or an unusable target supplied
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The target URL could not be parsed as an origin
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page could not be fetched or decoded
    #[error("Failed to load page '{url}': {reason}")]
    Load { url: String, reason: String },

    /// The cured tree could not be written back out
    #[error("Failed to serialize cured document: {0}")]
    Serialization(String),
}

/// Errors raised by an `AssetFetcher`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: u16 },

    /// The body exceeded the configured size cap
    #[error("Response from {url} exceeded {limit} bytes")]
    TooLarge { url: String, limit: usize },

    /// A text asset (stylesheet or script) was not valid UTF-8
    #[error("Response from {url} is not valid UTF-8 text")]
    InvalidText { url: String },
}

/// Per-element failures; the element is left untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("Malformed asset reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("Invalid extension pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The replacement node could not be built
    #[error("Could not build inline <{tag}> element")]
    Mutation { tag: String },
}

impl AssetError {
    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        AssetError::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or loading a `CureConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_concurrent_fetches must be at least 1")]
    ZeroConcurrency,

    #[error("max_asset_bytes must be at least 1")]
    ZeroAssetLimit,

    #[error("fetch_timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error("Extension set for {0} assets is empty")]
    EmptyExtensionSet(super::types::AssetClass),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
