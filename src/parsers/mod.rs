pub mod detail;
pub mod labels;
pub mod list;
pub mod time;

pub use detail::*;
pub use labels::*;
pub use list::*;
pub use time::*;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

use crate::error::CatalogError;

/// Collapses runs of whitespace (NBSP included) into single spaces and trims the ends.
/// Input is DOM text, which `scraper` has already entity-decoded; decoding again
/// would turn a literal `&lt;` into `<`.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, accent-free form of a name used as a search key.
pub fn to_search(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Orders display names the way a Spanish reader would: accents and case are
/// ignored first, then the raw text breaks ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    to_search(a).cmp(&to_search(b)).then_with(|| a.cmp(b))
}

static LEADING_INT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?\d+").expect("Invalid integer regex")
});

/// Integer at the start of a cell, ignoring trailing text (`"34 "` and `"34a"` both give 34).
pub fn parse_leading_int(text: &str) -> Option<i64> {
    LEADING_INT_REGEX
        .find(text.trim())
        .and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn selector(css: &str) -> Result<Selector, CatalogError> {
    Selector::parse(css).map_err(|e| CatalogError::selector(css, format!("{:?}", e)))
}

pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}
