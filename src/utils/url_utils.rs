//! URL string helpers shared by the normalizer and the curing routines.

use super::constants::DEFAULT_SCHEME_PREFIX;

/// Check if a reference is already inlined as a `data:` URL
#[must_use]
pub fn is_data_url(reference: &str) -> bool {
    reference.trim_start().starts_with("data:")
}

/// Check if `http://` or `https://` occurs anywhere in the string
///
/// Deliberately not anchored: a relative reference carrying an absolute URL in
/// its query string counts as already having a scheme.
#[must_use]
pub fn has_http_scheme(url: &str) -> bool {
    url.contains("http://") || url.contains("https://")
}

/// Prefix `http://` unless `has_http_scheme` already holds
#[must_use]
pub fn ensure_http_scheme(url: String) -> String {
    if has_http_scheme(&url) {
        url
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{url}")
    }
}
