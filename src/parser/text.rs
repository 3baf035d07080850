use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Replace every run of whitespace with a single space.
///
/// Nothing is trimmed: a cell rendered as `"\n  Open\n"` becomes `" Open "`,
/// which no longer equals the `"Open"` label.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Concatenated text of an element and all of its descendants.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
