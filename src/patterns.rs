//! Compiled regex patterns for text rendering and normalization.
//!
//! All patterns are compiled once using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Runs of CSS-collapsible white space inside a text node.
/// Non-breaking spaces are not collapsible and stay untouched.
pub static COLLAPSIBLE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\n\r\x0C]+").expect("COLLAPSIBLE_WHITESPACE regex")
});

/// Runs of spaces and tabs, collapsed to one space in the final text.
pub static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("HORIZONTAL_WHITESPACE regex")
});

/// Inline styles that take an element out of rendering.
pub static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden)\b")
        .expect("HIDDEN_STYLE regex")
});
