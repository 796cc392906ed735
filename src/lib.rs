pub mod config;
pub mod cure;
pub mod utils;

pub use config::{CureConfig, CureConfigBuilder, ExtensionSets};
pub use cure::{
    Antidote, AssetClass, AssetError, AssetFailure, AssetFetcher, CollectingReporter,
    ConfigError, CureError, CureResult, CureState, CureSummary, FailureReporter, FetchError,
    HttpFetcher, Ingredients, LogReporter,
};

/// Fetch `url` and return it with its assets inlined
///
/// Uses the default configuration and logs per-asset failures.
///
/// # Errors
///
/// Any fatal `CureError`; per-asset failures are not errors.
pub async fn cure(url: &str) -> CureResult<String> {
    let mut antidote = Antidote::new();
    antidote.configure(Ingredients::new(url))?;
    antidote.cure().await
}
