//! Slug encoding for property keys and archive filenames.
//!
//! The same function is used for attribute names (`"Estimated Restoration"`
//! becomes `estimated-restoration`) and for snapshot timestamps, so the
//! output must be safe both as a JSON key and as a filename component.

use regex::Regex;
use std::sync::LazyLock;

/// Separator emitted in place of whitespace and punctuation.
pub const SEPARATOR: char = '-';

/// Regex to collapse runs of separators into one.
static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Maps an arbitrary display string to a lowercase `[a-z0-9-]` token.
///
/// ASCII alphanumerics are lowercased and kept, whitespace and ASCII
/// punctuation become [`SEPARATOR`], and everything else is dropped.
/// Separator runs are collapsed and trimmed from both ends. Distinct inputs
/// may map to the same slug.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c.is_ascii_punctuation() {
                Some(SEPARATOR)
            } else {
                None
            }
        })
        .collect();

    SEPARATOR_RUN_RE
        .replace_all(&mapped, "-")
        .trim_matches(SEPARATOR)
        .to_string()
}
