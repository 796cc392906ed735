//! Extension matching for asset references
//!
//! Candidates are regular expressions matched anywhere in the reference, not
//! anchored suffixes. `.css` therefore also matches `style.css?v=2`, and since
//! `.` matches any character it matches `/cssfiles/data.json` too. Matching is
//! case-sensitive: `style.CSS` does not match `.css`.

use regex::Regex;

use super::errors::AssetError;
use super::types::AssetClass;
use crate::config::ExtensionSets;

/// One extension pattern, compiled once
#[derive(Debug, Clone)]
struct Candidate {
    pattern: String,
    compiled: Result<Regex, String>,
}

/// Ordered set of extension patterns for one asset class
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    candidates: Vec<Candidate>,
}

impl ExtensionMatcher {
    /// Compile the candidate patterns
    ///
    /// An invalid pattern does not fail construction. It fails the lookups
    /// that reach it, which keeps pattern errors per element.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.into();
                let compiled = Regex::new(&pattern).map_err(|e| e.to_string());
                Candidate { pattern, compiled }
            })
            .collect();
        Self { candidates }
    }

    /// Return the first candidate found in `reference`, in configured order
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Pattern` when an invalid candidate is reached
    /// before any valid one matched.
    pub fn find(&self, reference: &str) -> Result<Option<&str>, AssetError> {
        Ok(self.find_match(reference)?.map(|found| found.candidate))
    }

    /// Like `find`, but also keeps the text the candidate matched
    ///
    /// # Errors
    ///
    /// Same as `find`.
    pub fn find_match<'a, 'r>(
        &'a self,
        reference: &'r str,
    ) -> Result<Option<ExtensionMatch<'a, 'r>>, AssetError> {
        for candidate in &self.candidates {
            let regex = candidate
                .compiled
                .as_ref()
                .map_err(|reason| AssetError::Pattern {
                    pattern: candidate.pattern.clone(),
                    reason: reason.clone(),
                })?;
            if let Some(found) = regex.find(reference) {
                return Ok(Some(ExtensionMatch {
                    candidate: candidate.pattern.as_str(),
                    matched: found.as_str(),
                }));
            }
        }
        Ok(None)
    }

    /// Configured patterns in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.pattern.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A candidate that matched, and the part of the reference it matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionMatch<'a, 'r> {
    pub candidate: &'a str,
    pub matched: &'r str,
}

impl ExtensionMatch<'_, '_> {
    /// Media subtype for a data URL, e.g. `png` for `.PNG`
    ///
    /// A plain extension token (`.png`) is used as written. Any other
    /// pattern (`\.jpe?g`) falls back to the text it matched, so regex syntax
    /// never leaks into the MIME type.
    #[must_use]
    pub fn subtype(&self) -> String {
        let token = if is_plain_token(self.candidate) {
            self.candidate
        } else {
            self.matched
        };
        token
            .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_lowercase()
    }
}

/// `.` followed by ASCII letters and digits only
fn is_plain_token(candidate: &str) -> bool {
    candidate
        .strip_prefix('.')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// The three per-class matchers, built from an immutable `ExtensionSets`
#[derive(Debug, Clone)]
pub struct ExtensionMatchers {
    style: ExtensionMatcher,
    script: ExtensionMatcher,
    image: ExtensionMatcher,
}

impl ExtensionMatchers {
    #[must_use]
    pub fn from_sets(sets: &ExtensionSets) -> Self {
        Self {
            style: ExtensionMatcher::new(sets.style.iter().cloned()),
            script: ExtensionMatcher::new(sets.script.iter().cloned()),
            image: ExtensionMatcher::new(sets.image.iter().cloned()),
        }
    }

    #[must_use]
    pub fn for_class(&self, class: AssetClass) -> &ExtensionMatcher {
        match class {
            AssetClass::Style => &self.style,
            AssetClass::Script => &self.script,
            AssetClass::Image => &self.image,
        }
    }
}

impl Default for ExtensionMatchers {
    fn default() -> Self {
        Self::from_sets(&ExtensionSets::default())
    }
}
