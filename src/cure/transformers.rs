//! Asset transformers
//!
//! Transforming runs in two steps. `prepare` turns fetched bytes into a
//! `Replacement` and touches no tree, so it can run inside the concurrent
//! fetch phase. `apply` then writes the replacement into the element its unit
//! owns:
//! - style and script: insert an inline element holding the fetched text right
//!   after the original, then remove the original
//! - image: rewrite `src` in place to a base64 `data:` URL

use base64::Engine;

use super::errors::AssetError;
use super::fetcher::decode_text;
use super::page::Element;
use super::types::AssetClass;

/// Inlined form of one asset, ready to be written into its element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// New `<tag>text</tag>` sibling replacing the element
    Inline { tag: &'static str, text: String },
    /// New value for one attribute of the element
    Attribute { name: &'static str, value: String },
}

/// Build the replacement for a fetched asset of `class`
///
/// `subtype` is the image media subtype (e.g. `png`) and is ignored for text
/// assets; `url` is only used for error reporting.
///
/// # Errors
///
/// Text assets that are not UTF-8.
pub fn prepare(
    class: AssetClass,
    subtype: &str,
    url: &str,
    body: Vec<u8>,
) -> Result<Replacement, AssetError> {
    match class.inline_tag() {
        Some(tag) => Ok(Replacement::Inline {
            tag,
            text: decode_text(url, body)?,
        }),
        None => Ok(Replacement::Attribute {
            name: class.attribute(),
            value: image_data_url(subtype, &body),
        }),
    }
}

/// Write `replacement` into `element`; no await happens in here
///
/// # Errors
///
/// Returns `AssetError::Mutation` if the inline element cannot be built; the
/// original element is then left in place.
pub fn apply(element: &Element, replacement: &Replacement) -> Result<(), AssetError> {
    match replacement {
        Replacement::Inline { tag, text } => replace_with_inline(element, tag, text),
        Replacement::Attribute { name, value } => {
            element.set_attr(name, value.clone());
            Ok(())
        }
    }
}

/// Replace a reference-bearing element with `<tag>text</tag>`
///
/// # Errors
///
/// Returns `AssetError::Mutation` if the inline element cannot be built.
pub fn replace_with_inline(element: &Element, tag: &str, text: &str) -> Result<(), AssetError> {
    if !element.insert_after_raw(tag, text) {
        return Err(AssetError::Mutation {
            tag: tag.to_string(),
        });
    }
    element.remove();
    Ok(())
}

/// `data:image/<subtype>;base64,<payload>`
#[must_use]
pub fn image_data_url(subtype: &str, bytes: &[u8]) -> String {
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut encoded = String::with_capacity(encoded_capacity + 20 + subtype.len());

    encoded.push_str("data:image/");
    encoded.push_str(subtype);
    encoded.push_str(";base64,");
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut encoded);

    encoded
}
