//! Asset curing
//!
//! Replaces external stylesheet, script and image references in an HTML page
//! with inline copies of the fetched assets. Failures are per element: a
//! missing asset leaves its reference as it was.

pub mod errors;
pub mod extensions;
pub mod fetcher;
pub mod normalizer;
pub mod orchestrator;
pub mod page;
pub mod reporter;
pub mod routines;
pub mod transformers;
pub mod types;

pub use errors::{AssetError, ConfigError, CureError, CureResult, FetchError};
pub use extensions::{ExtensionMatch, ExtensionMatcher, ExtensionMatchers};
pub use fetcher::{AssetFetcher, HttpFetcher};
pub use normalizer::{Origin, normalize};
pub use orchestrator::{Antidote, CureState, Ingredients};
pub use page::{Element, Page};
pub use reporter::{CollectingReporter, FailureReporter, LogReporter};
pub use transformers::Replacement;
pub use types::{AssetClass, AssetFailure, ClassTally, CureSummary, UnitOutcome};
