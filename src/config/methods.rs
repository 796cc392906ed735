//! Builder setters

use super::builder::CureConfigBuilder;
use super::types::ExtensionSets;

impl CureConfigBuilder {
    /// Replace all three extension sets at once
    #[must_use]
    pub fn extensions(mut self, extensions: ExtensionSets) -> Self {
        self.extensions = extensions;
        self
    }

    #[must_use]
    pub fn style_extensions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.style = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn script_extensions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.script = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Image patterns are case-sensitive; list every spelling to accept
    #[must_use]
    pub fn image_extensions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.image = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Cap the units in flight per asset class. `None` (the default) is
    /// unbounded.
    #[must_use]
    pub fn max_concurrent_fetches(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_fetches = limit;
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Reject bodies larger than `bytes`, announced or streamed
    #[must_use]
    pub fn max_asset_bytes(mut self, bytes: Option<usize>) -> Self {
        self.max_asset_bytes = bytes;
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, agent: Option<S>) -> Self {
        self.user_agent = agent.map(Into::into);
        self
    }
}
