//! Dutch postcode (PC4) extraction from free-text addresses.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::RangeInclusive;

/// Four digits, optional whitespace, two uppercase letters, word-bounded.
static POSTCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{4})\s*[A-Z]{2}\b").expect("postcode regex is valid"));

/// PC4 prefixes covering the municipality of Amsterdam.
pub const AMSTERDAM_PC4: RangeInclusive<u16> = 1000..=1119;

/// Returns the 4-digit prefix of the first Dutch postcode found in `address`.
///
/// ```
/// use pc4_atlas::postcode::extract_pc4;
///
/// assert_eq!(extract_pc4("Prinsengracht 263, 1016 GV Amsterdam"), Some("1016"));
/// assert_eq!(extract_pc4("Somewhere without a postcode"), None);
/// ```
pub fn extract_pc4(address: &str) -> Option<&str> {
    POSTCODE_RE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether a PC4 prefix lies within Amsterdam.
pub fn is_amsterdam(pc4: &str) -> bool {
    pc4.parse::<u16>()
        .map(|n| AMSTERDAM_PC4.contains(&n))
        .unwrap_or(false)
}
