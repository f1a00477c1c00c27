//! Tag constants and catalogs.
//!
//! Provides both arrays (for iteration) and `HashSets` (for O(1) lookup) of the
//! tag groups the extractor and the text renderer care about.

use std::collections::HashSet;
use std::sync::LazyLock;

// === Tag Lists (arrays for iteration) ===

/// Heading tags in level order: h1-h6
pub static HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Elements that never contribute rendered text
pub static NON_RENDERED_TAGS: [&str; 10] = [
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "iframe", "object",
];

/// Cell tags: th, td
pub static CELL_TAGS: [&str; 2] = ["th", "td"];

/// Block-level elements: each starts and ends a line of rendered text
pub static BLOCK_TAGS: [&str; 42] = [
    "address", "article", "aside", "blockquote", "body", "caption", "center", "dd",
    "details", "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr",
    "html", "legend", "li", "main", "menu", "nav", "ol", "p", "pre", "section",
    "summary", "table", "tr", "ul",
];

// === Tag Sets (HashSets for O(1) lookup) ===

/// `NON_RENDERED_TAGS` as a `HashSet`
pub static NON_RENDERED_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NON_RENDERED_TAGS.into_iter().collect());

/// `BLOCK_TAGS` as a `HashSet`
pub static BLOCK_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| BLOCK_TAGS.into_iter().collect());

// === Helper Functions ===

/// Heading level of a tag name: 1-6 for `h1`-`h6`, 0 for anything else.
#[must_use]
pub fn heading_level(tag: &str) -> u8 {
    HEADING_TAGS
        .iter()
        .position(|h| h.eq_ignore_ascii_case(tag))
        .and_then(|index| u8::try_from(index + 1).ok())
        .unwrap_or(0)
}

/// Check if a tag is a table cell
#[inline]
#[must_use]
pub fn is_cell(tag: &str) -> bool {
    CELL_TAGS.contains(&tag)
}
