//! Postcode district derivation.

use regex::Regex;
use std::sync::LazyLock;

static FULL_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{1,2}[0-9][A-Z0-9]?)[0-9][A-Z]{2}$").expect("static regex")
});

static LEADING_DISTRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]?").expect("static regex"));

/// Uppercase and drop every whitespace character.
pub fn clean_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Derive the postcode district (outward code) from a raw postcode.
///
/// A complete postcode is split on its fixed three-character inward code, which
/// keeps `M1 1AE` at `M1` even with the space removed. Anything else falls
/// back to the leading letters-digit prefix. No match gives an empty string:
/// an unknown district is a category, not an error.
pub fn postcode_district(raw: &str) -> String {
    let cleaned = clean_postcode(raw);

    if let Some(caps) = FULL_POSTCODE.captures(&cleaned) {
        return caps[1].to_string();
    }

    LEADING_DISTRICT
        .find(&cleaned)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
