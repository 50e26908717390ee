//! Slide text normalisation.
//!
//! Turns the raw text reported for the current slide into the canonical
//! string that is relayed and matched against trigger rules.

/// Relayed when the slide carries no text at all.
pub const BLANK: &str = "\n";

/// Relayed instead of an empty string, which some receivers ignore.
pub const EMPTY_FALLBACK: &str = " ";

/// Canonicalise raw slide text.
///
/// - absent text becomes [`BLANK`]
/// - with a non-empty `split_delimiter`, only the part before its first
///   occurrence is kept
/// - NUL characters become spaces
/// - surrounding whitespace is trimmed
/// - an empty result becomes [`EMPTY_FALLBACK`]
#[must_use]
pub fn normalize(raw: Option<&str>, split_delimiter: Option<&str>) -> String {
    let Some(raw) = raw else {
        return BLANK.to_string();
    };

    let head = match split_delimiter.filter(|d| !d.is_empty()) {
        Some(delimiter) => raw.split_once(delimiter).map_or(raw, |(head, _)| head),
        None => raw,
    };

    let cleaned = head.replace('\0', " ");
    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '\0');

    if trimmed.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
