//! Shared configuration constants for antidote
//!
//! This module contains default values used throughout the codebase to keep
//! the extension sets and URL prefixes in one place.

/// Default stylesheet extension patterns
///
/// Matched against `<link href>` values. Patterns are regular expressions,
/// so the `.` matches any character.
pub const DEFAULT_STYLE_EXTENSIONS: &[&str] = &[".css"];

/// Default script extension patterns, matched against `<script src>` values
pub const DEFAULT_SCRIPT_EXTENSIONS: &[&str] = &[".js"];

/// Default raster image extension patterns, matched against `<img src>` values
///
/// Case-sensitive, so both spellings are listed. Treated as a set: which case
/// variant is reported for a reference matching several is unspecified.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    ".jpeg", ".JPEG", ".jpg", ".JPG", ".gif", ".GIF", ".png", ".PNG", ".bmp", ".BMP", ".tiff",
    ".TIFF",
];

/// Scheme prepended to normalized URLs that carry none
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Environment variable the binary reads a JSON `CureConfig` path from
pub const CONFIG_ENV_VAR: &str = "ANTIDOTE_CONFIG";
