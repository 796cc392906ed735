//! Curing orchestrator
//!
//! `Antidote` owns one cure at a time: it loads the page, runs the style,
//! script and image routines concurrently over the shared tree and serializes
//! the result.
//!
//! ```text
//! Uninitialized -> Configured -> Loading -> Curing -> Cured
//!                                   |          |
//!                                   +-> Failed <+
//! ```

use std::fmt;
use std::sync::Arc;

use futures::join;

use super::errors::{CureError, CureResult};
use super::extensions::ExtensionMatchers;
use super::fetcher::{AssetFetcher, HttpFetcher};
use super::normalizer::Origin;
use super::page::Page;
use super::reporter::{FailureReporter, LogReporter};
use super::routines::{CureContext, PreparedClass, apply_class, discover, prepare_class};
use super::types::{AssetClass, CureSummary};
use crate::config::CureConfig;

/// What to cure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredients {
    /// Absolute URL of the page
    pub url: String,
}

impl Ingredients {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Lifecycle of an `Antidote`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CureState {
    Uninitialized,
    Configured,
    Loading,
    Curing,
    Cured,
    Failed,
}

impl fmt::Display for CureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CureState::Uninitialized => "uninitialized",
            CureState::Configured => "configured",
            CureState::Loading => "loading",
            CureState::Curing => "curing",
            CureState::Cured => "cured",
            CureState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Web page curing orchestrator
pub struct Antidote<F = HttpFetcher> {
    config: CureConfig,
    matchers: ExtensionMatchers,
    fetcher: F,
    reporter: Arc<dyn FailureReporter>,
    ingredients: Option<Ingredients>,
    state: CureState,
    cured_html: Option<String>,
    last_summary: Option<CureSummary>,
}

impl Antidote<HttpFetcher> {
    /// Orchestrator with default configuration and a plain HTTP fetcher
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CureConfig::default())
    }

    /// Orchestrator whose HTTP fetcher honours the config's fetch knobs
    #[must_use]
    pub fn with_config(config: CureConfig) -> Self {
        let fetcher = HttpFetcher::from_config(&config);
        Self::with_fetcher(config, fetcher)
    }
}

impl Default for Antidote<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: AssetFetcher> Antidote<F> {
    /// Orchestrator over any fetcher; the page is loaded through it as well
    #[must_use]
    pub fn with_fetcher(config: CureConfig, fetcher: F) -> Self {
        let matchers = ExtensionMatchers::from_sets(config.extensions());
        Self {
            config,
            matchers,
            fetcher,
            reporter: Arc::new(LogReporter),
            ingredients: None,
            state: CureState::Uninitialized,
            cured_html: None,
            last_summary: None,
        }
    }

    /// Replace the failure reporter (defaults to `LogReporter`)
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Set the page to cure; allowed from any state
    ///
    /// # Errors
    ///
    /// Returns `CureError::Configuration` for a blank URL, leaving the state
    /// unchanged.
    pub fn configure(&mut self, ingredients: Ingredients) -> CureResult<()> {
        if ingredients.url.trim().is_empty() {
            return Err(CureError::Configuration("page URL is empty".to_string()));
        }
        log::debug!("Configured to cure {}", ingredients.url);
        self.ingredients = Some(ingredients);
        self.state = CureState::Configured;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> CureState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &CureConfig {
        &self.config
    }

    /// Last successfully cured document
    #[must_use]
    pub fn cured_output(&self) -> Option<&str> {
        self.cured_html.as_deref()
    }

    /// Counts and failures of the last cure that reached the curing phase
    #[must_use]
    pub fn last_summary(&self) -> Option<&CureSummary> {
        self.last_summary.as_ref()
    }

    /// Load the configured page, inline its assets and return the document
    ///
    /// Per-element failures are reported and leave their element untouched;
    /// only the errors below end the cure. The returned future is `Send`, so
    /// a cure can be spawned onto a multi-threaded runtime.
    ///
    /// # Errors
    ///
    /// - `Configuration` if `configure` was never called
    /// - `InvalidUrl` if the page URL has no usable origin
    /// - `Load` if the page cannot be fetched or is not UTF-8
    /// - `Serialization` if the cured tree cannot be written out
    pub async fn cure(&mut self) -> CureResult<String> {
        let Some(url) = self.ingredients.as_ref().map(|i| i.url.clone()) else {
            return Err(CureError::Configuration(
                "cure() called before configure()".to_string(),
            ));
        };

        self.state = CureState::Loading;
        let origin = self.fail_on_err(Origin::parse(&url))?;

        log::info!("Loading page {url}");
        let loaded = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| CureError::Load {
                url: url.clone(),
                reason: e.to_string(),
            })
            .and_then(|body| {
                String::from_utf8(body).map_err(|_| CureError::Load {
                    url: url.clone(),
                    reason: "page is not valid UTF-8".to_string(),
                })
            });
        let html = self.fail_on_err(loaded)?;

        self.cure_loaded(&origin, &html).await
    }

    /// Cure a page whose HTML was obtained elsewhere
    ///
    /// `url` supplies the origin that relative references resolve against.
    /// The orchestrator ends up configured for `url`.
    ///
    /// # Errors
    ///
    /// Same as `cure`, minus `Load`.
    pub async fn cure_html(&mut self, html: &str, url: &str) -> CureResult<String> {
        self.configure(Ingredients::new(url))?;
        self.state = CureState::Loading;
        let origin = self.fail_on_err(Origin::parse(url))?;
        self.cure_loaded(&origin, html).await
    }

    async fn cure_loaded(&mut self, origin: &Origin, html: &str) -> CureResult<String> {
        self.state = CureState::Curing;

        // The tree is Rc based: read the references, then drop it before
        // any await so the cure future stays Send.
        let (styles, scripts, images) = {
            let page = Page::parse(html);
            (
                discover(&page, AssetClass::Style),
                discover(&page, AssetClass::Script),
                discover(&page, AssetClass::Image),
            )
        };

        let ctx = CureContext {
            origin,
            matchers: &self.matchers,
            fetcher: &self.fetcher,
            reporter: &*self.reporter,
            max_concurrent: self.config.max_concurrent_fetches(),
        };

        let (styles, scripts, images) = join!(
            prepare_class(&ctx, styles),
            prepare_class(&ctx, scripts),
            prepare_class(&ctx, images)
        );

        let (summary, serialized) =
            apply_replacements(html, [styles, scripts, images], &*self.reporter);
        log::info!(
            "Cured {} assets from {} ({} skipped, {} failed)",
            summary.cured,
            origin.host(),
            summary.skipped,
            summary.failures.len()
        );
        self.last_summary = Some(summary);

        let output = self.fail_on_err(serialized)?;
        self.cured_html = Some(output.clone());
        self.state = CureState::Cured;
        Ok(output)
    }

    /// Move to `Failed` when `result` is an error
    fn fail_on_err<T>(&mut self, result: CureResult<T>) -> CureResult<T> {
        if let Err(ref e) = result {
            log::error!("Cure failed: {e}");
            self.state = CureState::Failed;
        }
        result
    }
}

/// Re-parse `html`, write every prepared replacement and serialize
///
/// Synchronous, so the tree never crosses an await point.
fn apply_replacements(
    html: &str,
    prepared: [PreparedClass; 3],
    reporter: &dyn FailureReporter,
) -> (CureSummary, CureResult<String>) {
    let page = Page::parse(html);
    let tallies = prepared.map(|class| apply_class(&page, class, reporter));
    (CureSummary::from_tallies(tallies), page.serialize())
}
