//! Per-asset-class curing routines
//!
//! A routine runs in three phases so that the document tree, which is `Rc`
//! based, never lives across an `.await`:
//!
//! 1. `discover` reads the references of one class's elements, in document
//!    order, from a parsed page.
//! 2. `prepare_class` launches one unit of work per reference and waits for
//!    all of them (fan-out/fan-in). A unit matches the extension, normalizes
//!    the reference, fetches and builds the replacement. Only owned strings
//!    cross its await points, so the phase is `Send`.
//! 3. `apply_class` writes each replacement into the element at the same
//!    position of a freshly parsed tree. Each mutation is synchronous.
//!
//! Any error ends only its unit: it is reported, the element is left
//! untouched and the siblings carry on.

use futures::StreamExt;
use futures::future::join_all;
use futures::stream;

use super::errors::AssetError;
use super::extensions::ExtensionMatchers;
use super::fetcher::AssetFetcher;
use super::normalizer::{Origin, normalize};
use super::page::Page;
use super::reporter::FailureReporter;
use super::transformers::{self, Replacement};
use super::types::{AssetClass, AssetFailure, ClassTally, UnitOutcome};
use crate::utils::is_data_url;

/// Everything a unit of work reads; shared by reference across all units
pub struct CureContext<'a, F> {
    pub origin: &'a Origin,
    pub matchers: &'a ExtensionMatchers,
    pub fetcher: &'a F,
    pub reporter: &'a dyn FailureReporter,
    /// `None` launches every unit at once
    pub max_concurrent: Option<usize>,
}

/// References found on one class's elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub class: AssetClass,
    /// Element position among the class's elements, and its reference
    pub references: Vec<(usize, String)>,
    /// Elements without a reference, or already inlined
    pub skipped: usize,
}

/// Result of one unit's fetch phase
#[derive(Debug)]
pub struct PreparedUnit {
    pub index: usize,
    pub reference: String,
    /// `None` when the reference carries no recognized extension
    pub replacement: Option<Replacement>,
}

/// Fetch-phase results of one class, waiting to be applied
#[derive(Debug)]
pub struct PreparedClass {
    pub class: AssetClass,
    pub skipped: usize,
    pub ready: Vec<PreparedUnit>,
    pub failures: Vec<AssetFailure>,
}

/// Read the references of every element of `class`
#[must_use]
pub fn discover(page: &Page, class: AssetClass) -> Discovered {
    let elements = page.find_all(class.tag());
    log::debug!("Found {} <{}> elements to process", elements.len(), class.tag());

    let mut references = Vec::with_capacity(elements.len());
    let mut skipped = 0;
    for (index, element) in elements.iter().enumerate() {
        match element.attr(class.attribute()) {
            // Already inlined
            Some(reference) if is_data_url(&reference) => skipped += 1,
            Some(reference) => references.push((index, reference)),
            None => skipped += 1,
        }
    }

    Discovered {
        class,
        references,
        skipped,
    }
}

/// Fetch and transform every discovered reference, waiting for all units
pub async fn prepare_class<F: AssetFetcher>(
    ctx: &CureContext<'_, F>,
    discovered: Discovered,
) -> PreparedClass {
    let class = discovered.class;
    let units = discovered
        .references
        .into_iter()
        .map(|(index, reference)| prepare_unit(ctx, class, index, reference));

    let results: Vec<Result<PreparedUnit, AssetFailure>> = match ctx.max_concurrent {
        Some(limit) => {
            stream::iter(units)
                .buffer_unordered(limit.max(1))
                .collect()
                .await
        }
        None => join_all(units).await,
    };

    let mut prepared = PreparedClass {
        class,
        skipped: discovered.skipped,
        ready: Vec::with_capacity(results.len()),
        failures: Vec::new(),
    };
    for result in results {
        match result {
            Ok(unit) => prepared.ready.push(unit),
            Err(failure) => prepared.failures.push(failure),
        }
    }
    prepared
}

/// One element's unit of work, up to the mutation
async fn prepare_unit<F: AssetFetcher>(
    ctx: &CureContext<'_, F>,
    class: AssetClass,
    index: usize,
    reference: String,
) -> Result<PreparedUnit, AssetFailure> {
    match try_prepare(ctx, class, &reference).await {
        Ok(replacement) => Ok(PreparedUnit {
            index,
            reference,
            replacement,
        }),
        Err(error) => Err(report(ctx.reporter, class, reference, error)),
    }
}

async fn try_prepare<F: AssetFetcher>(
    ctx: &CureContext<'_, F>,
    class: AssetClass,
    reference: &str,
) -> Result<Option<Replacement>, AssetError> {
    let Some(found) = ctx.matchers.for_class(class).find_match(reference)? else {
        return Ok(None);
    };
    let subtype = found.subtype();

    let url = normalize(reference, ctx.origin)?;
    log::debug!("Processing {class}: {reference} -> {url}");

    let body = ctx.fetcher.fetch(&url).await?;
    transformers::prepare(class, &subtype, &url, body).map(Some)
}

/// Write prepared replacements into `page` and tally the class
///
/// `page` must be parsed from the same HTML `discover` saw, so element
/// positions line up. Classes touch disjoint tags, so applying one class
/// never shifts another class's positions.
pub fn apply_class(
    page: &Page,
    prepared: PreparedClass,
    reporter: &dyn FailureReporter,
) -> ClassTally {
    let class = prepared.class;
    let elements = page.find_all(class.tag());

    let mut tally = ClassTally::new(class);
    tally.skipped = prepared.skipped;
    tally.failures = prepared.failures;

    for unit in prepared.ready {
        let Some(replacement) = unit.replacement else {
            tally.record(UnitOutcome::Skipped);
            continue;
        };

        let result = match elements.get(unit.index) {
            Some(element)
                if element.attr(class.attribute()).as_deref() == Some(unit.reference.as_str()) =>
            {
                transformers::apply(element, &replacement)
            }
            _ => Err(AssetError::Mutation {
                tag: class.tag().to_string(),
            }),
        };

        let outcome = match result {
            Ok(()) => {
                log::debug!("Inlined {class} from {}", unit.reference);
                UnitOutcome::Cured
            }
            Err(error) => UnitOutcome::Failed(report(reporter, class, unit.reference, error)),
        };
        tally.record(outcome);
    }

    log::debug!(
        "{class} routine finished: {} cured, {} skipped, {} failed",
        tally.cured,
        tally.skipped,
        tally.failures.len()
    );
    tally
}

fn report(
    reporter: &dyn FailureReporter,
    class: AssetClass,
    reference: String,
    error: AssetError,
) -> AssetFailure {
    let failure = AssetFailure {
        class,
        reference,
        error,
    };
    reporter.report(&failure);
    failure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cure::errors::FetchError;
    use crate::cure::reporter::CollectingReporter;
    use std::collections::HashMap;
    use std::future::Future;

    struct StaticFetcher(HashMap<String, Vec<u8>>);

    impl AssetFetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
            let result = self.0.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
            async move {
                tokio::task::yield_now().await;
                result
            }
        }
    }

    fn fetcher(entries: &[(&str, &[u8])]) -> StaticFetcher {
        StaticFetcher(
            entries
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_vec()))
                .collect(),
        )
    }

    async fn cure_one_class(
        html: &str,
        class: AssetClass,
        fetcher: &StaticFetcher,
        reporter: &CollectingReporter,
        max_concurrent: Option<usize>,
    ) -> (ClassTally, String) {
        let origin = Origin::new("http", "b.com");
        let matchers = ExtensionMatchers::default();
        let ctx = CureContext {
            origin: &origin,
            matchers: &matchers,
            fetcher,
            reporter,
            max_concurrent,
        };

        let discovered = discover(&Page::parse(html), class);
        let prepared = prepare_class(&ctx, discovered).await;

        let page = Page::parse(html);
        let tally = apply_class(&page, prepared, reporter);
        (tally, page.serialize().unwrap())
    }

    #[tokio::test]
    async fn routine_cures_matching_elements_and_skips_others() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/a.css">
            <link rel="icon" href="/favicon.ico">
            <link rel="stylesheet">
            <link rel="stylesheet" href="/missing.css">
            </head><body></body></html>"#;
        let fetcher = fetcher(&[("http://b.com/a.css", b"body{}")]);
        let reporter = CollectingReporter::new();

        let (tally, html) =
            cure_one_class(html, AssetClass::Style, &fetcher, &reporter, None).await;

        assert_eq!(tally.cured, 1);
        assert_eq!(tally.skipped, 2);
        assert_eq!(tally.failures.len(), 1);
        assert_eq!(tally.failures[0].reference, "/missing.css");
        assert_eq!(reporter.failures(), tally.failures);

        assert!(html.contains("<style>body{}</style>"));
        assert!(html.contains("href=\"/missing.css\""));
        assert!(html.contains("href=\"/favicon.ico\""));
    }

    #[tokio::test]
    async fn data_urls_and_malformed_references_do_not_fetch() {
        let html = r#"<html><body>
            <img src="data:image/png;base64,AAAA">
            <img src="/bad%zz.png">
            </body></html>"#;
        let fetcher = fetcher(&[]);
        let reporter = CollectingReporter::new();

        let (tally, _) =
            cure_one_class(html, AssetClass::Image, &fetcher, &reporter, Some(1)).await;

        assert_eq!(tally.cured, 0);
        assert_eq!(tally.skipped, 1);
        assert!(matches!(
            tally.failures[0].error,
            AssetError::MalformedReference { .. }
        ));
    }

    #[test]
    fn discover_records_positions_in_document_order() {
        let page = Page::parse(
            r#"<html><body><script>inline()</script><script src="/a.js"></script><script src="data:text/javascript,x"></script><script src="/b.js"></script></body></html>"#,
        );

        let discovered = discover(&page, AssetClass::Script);

        assert_eq!(
            discovered.references,
            [(1, "/a.js".to_string()), (3, "/b.js".to_string())]
        );
        assert_eq!(discovered.skipped, 2);
    }

    #[test]
    fn replacement_for_a_changed_element_is_not_applied() {
        let prepared = PreparedClass {
            class: AssetClass::Image,
            skipped: 0,
            ready: vec![PreparedUnit {
                index: 0,
                reference: "/a.png".into(),
                replacement: Some(Replacement::Attribute {
                    name: "src",
                    value: "data:image/png;base64,AAAA".into(),
                }),
            }],
            failures: Vec::new(),
        };
        let page = Page::parse(r#"<html><body><img src="/other.png"></body></html>"#);
        let reporter = CollectingReporter::new();

        let tally = apply_class(&page, prepared, &reporter);

        assert_eq!(tally.cured, 0);
        assert!(matches!(tally.failures[0].error, AssetError::Mutation { .. }));
        assert_eq!(page.find_all("img")[0].attr("src").as_deref(), Some("/other.png"));
        assert_eq!(reporter.len(), 1);
    }
}
