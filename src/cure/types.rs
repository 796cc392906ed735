//! Type definitions for asset curing

use super::errors::AssetError;

/// Asset class for element enumeration and error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Style,
    Script,
    Image,
}

impl AssetClass {
    /// Every class, in the order routines are launched
    pub const ALL: [AssetClass; 3] = [AssetClass::Style, AssetClass::Script, AssetClass::Image];

    /// Tag name of the elements carrying references of this class
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            AssetClass::Style => "link",
            AssetClass::Script => "script",
            AssetClass::Image => "img",
        }
    }

    /// Attribute holding the reference
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            AssetClass::Style => "href",
            AssetClass::Script | AssetClass::Image => "src",
        }
    }

    /// Tag of the inline element that replaces the original, if any.
    /// Images are rewritten in place.
    #[must_use]
    pub fn inline_tag(self) -> Option<&'static str> {
        match self {
            AssetClass::Style => Some("style"),
            AssetClass::Script => Some("script"),
            AssetClass::Image => None,
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Style => write!(f, "CSS"),
            AssetClass::Script => write!(f, "JS"),
            AssetClass::Image => write!(f, "Image"),
        }
    }
}

/// Failure information for one element that could not be cured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub class: AssetClass,
    /// The raw attribute value as found in the document
    pub reference: String,
    pub error: AssetError,
}

impl std::fmt::Display for AssetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to cure {} '{}': {}",
            self.class, self.reference, self.error
        )
    }
}

/// What happened to one element's unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The element was inlined
    Cured,
    /// No reference, an already inlined `data:` URL, or no extension match
    Skipped,
    /// Something failed; the element was left untouched
    Failed(AssetFailure),
}

/// Outcome counts for one asset class routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTally {
    pub class: AssetClass,
    pub cured: usize,
    pub skipped: usize,
    pub failures: Vec<AssetFailure>,
}

impl ClassTally {
    #[must_use]
    pub fn new(class: AssetClass) -> Self {
        Self {
            class,
            cured: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Cured => self.cured += 1,
            UnitOutcome::Skipped => self.skipped += 1,
            UnitOutcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

/// Summary of the last cure with success and failure tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CureSummary {
    pub cured: usize,
    pub skipped: usize,
    pub failures: Vec<AssetFailure>,
}

impl CureSummary {
    #[must_use]
    pub fn from_tallies(tallies: impl IntoIterator<Item = ClassTally>) -> Self {
        tallies
            .into_iter()
            .fold(CureSummary::default(), |mut summary, tally| {
                summary.cured += tally.cured;
                summary.skipped += tally.skipped;
                summary.failures.extend(tally.failures);
                summary
            })
    }

    /// Number of elements that were attempted (cured or failed)
    #[must_use]
    pub fn total(&self) -> usize {
        self.cured + self.failures.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Failure rate as a ratio between 0.0 and 1.0
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.failures.len() as f64 / total as f64
        }
    }

    /// Failures of a single asset class
    pub fn failures_for(&self, class: AssetClass) -> impl Iterator<Item = &AssetFailure> {
        self.failures.iter().filter(move |f| f.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cure::errors::FetchError;

    fn failure(class: AssetClass) -> AssetFailure {
        AssetFailure {
            class,
            reference: "/missing".into(),
            error: AssetError::Fetch(FetchError::Status {
                url: "http://a.com/missing".into(),
                status: 404,
            }),
        }
    }

    #[test]
    fn summary_merges_tallies() {
        let mut style = ClassTally::new(AssetClass::Style);
        style.record(UnitOutcome::Cured);
        style.record(UnitOutcome::Skipped);
        let mut image = ClassTally::new(AssetClass::Image);
        image.record(UnitOutcome::Cured);
        image.record(UnitOutcome::Cured);
        image.record(UnitOutcome::Failed(failure(AssetClass::Image)));

        let summary = CureSummary::from_tallies([style, ClassTally::new(AssetClass::Script), image]);

        assert_eq!(summary.cured, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
        assert!(summary.has_failures());
        assert!((summary.failure_rate() - 0.25).abs() < f64::EPSILON);
        assert_eq!(summary.failures_for(AssetClass::Image).count(), 1);
        assert_eq!(summary.failures_for(AssetClass::Style).count(), 0);
    }

    #[test]
    fn empty_summary_has_zero_failure_rate() {
        let summary = CureSummary::default();
        assert_eq!(summary.failure_rate(), 0.0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn classes_map_to_their_tags() {
        assert_eq!(AssetClass::Style.tag(), "link");
        assert_eq!(AssetClass::Style.attribute(), "href");
        assert_eq!(AssetClass::Script.inline_tag(), Some("script"));
        assert_eq!(AssetClass::Image.inline_tag(), None);
        assert_eq!(AssetClass::Script.to_string(), "JS");
    }
}
