//! Asset reference normalization
//!
//! Turns the raw `href`/`src` of an element into a URL the fetcher can request.
//! This is a heuristic, not an RFC 3986 resolver:
//!
//! - a leading `//` is stripped once and the host that follows is kept,
//! - every `../` is removed wherever it appears, so `a/../b/c.css` becomes
//!   `a/b/c.css` rather than `b/c.css`,
//! - host-less references are joined to the origin host, ignoring the page's
//!   own path,
//! - `http://` is prepended when neither `http://` nor `https://` occurs
//!   anywhere in the result.
//!
//! Callers must not rely on correct results for deeply nested relative paths.

use url::Url;

use super::errors::{AssetError, CureError};
use crate::utils::ensure_http_scheme;

/// Scheme and host (with explicit port, if any) of the page being cured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
}

impl Origin {
    /// Parse the page URL into an origin
    ///
    /// # Errors
    ///
    /// Returns `CureError::InvalidUrl` if the URL does not parse or has no host.
    pub fn parse(page_url: &str) -> Result<Self, CureError> {
        let invalid = |reason: String| CureError::InvalidUrl {
            url: page_url.to_string(),
            reason,
        };

        let parsed = Url::parse(page_url).map_err(|e| invalid(e.to_string()))?;
        let host = authority(&parsed).ok_or_else(|| invalid("URL has no host".to_string()))?;

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
        })
    }

    /// Build an origin from parts without validation
    #[must_use]
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Normalize an asset reference against the page origin
///
/// # Errors
///
/// Returns `AssetError::MalformedReference` when the reference cannot be
/// parsed as a URL reference.
pub fn normalize(reference: &str, origin: &Origin) -> Result<String, AssetError> {
    let host = parse_reference_host(reference)?;

    let mut cleaned = reference.strip_prefix("//").unwrap_or(reference).to_string();
    cleaned = cleaned.replace("../", "");

    let joined = match host {
        Some(_) => cleaned,
        None => format!("{}/{}", origin.host(), cleaned.trim_start_matches('/')),
    };

    Ok(ensure_http_scheme(joined))
}

/// Parse a reference leniently and return its host, if it has one
fn parse_reference_host(reference: &str) -> Result<Option<String>, AssetError> {
    if let Some(c) = reference.chars().find(|c| c.is_ascii_control()) {
        return Err(AssetError::malformed(
            reference,
            format!("invalid control character {c:?}"),
        ));
    }

    // Escapes are only validated before the query, as lenient parsers do.
    let before_query = reference.split(['?', '#']).next().unwrap_or_default();
    validate_percent_escapes(reference, before_query)?;

    if let Some(rest) = reference.strip_prefix("//") {
        let parsed = Url::parse(&format!("http://{rest}"))
            .map_err(|e| AssetError::malformed(reference, e.to_string()))?;
        return Ok(authority(&parsed));
    }

    if let Some(after_scheme) = split_scheme(reference)? {
        let parsed =
            Url::parse(reference).map_err(|e| AssetError::malformed(reference, e.to_string()))?;
        // `http:x.css` has a scheme but no authority, so no host either.
        return Ok(if after_scheme.starts_with("//") {
            authority(&parsed)
        } else {
            None
        });
    }

    // Relative path: make sure it can be joined onto some base at all.
    Url::parse("http://origin.invalid/")
        .and_then(|base| base.join(reference))
        .map_err(|e| AssetError::malformed(reference, e.to_string()))?;
    Ok(None)
}

/// Split off a leading `scheme:`; returns what follows the colon
///
/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`. Any other
/// character before the first `:` means the reference is a relative path.
fn split_scheme(reference: &str) -> Result<Option<&str>, AssetError> {
    for (i, c) in reference.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => return Err(AssetError::malformed(reference, "missing protocol scheme")),
            ':' => return Ok(Some(&reference[i + 1..])),
            _ => return Ok(None),
        }
    }
    Ok(None)
}

fn validate_percent_escapes(reference: &str, part: &str) -> Result<(), AssetError> {
    let bytes = part.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                let escape = part.get(i..end).unwrap_or("%");
                return Err(AssetError::malformed(
                    reference,
                    format!("invalid URL escape {escape:?}"),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Host plus explicit port, like an HTTP `Host` header
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
