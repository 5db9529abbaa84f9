//! Link resolution for event listings.
//!
//! An event's declared URL is preferred. When the listing has none, the first
//! `http(s)://` URL found in the free-text description is used instead.
//!
//! # Example
//!
//! ```
//! use eventfeed_core::links::resolve_link;
//!
//! let link = resolve_link(None, Some("RSVP at https://example.test/e/42 today"));
//! assert_eq!(link, "https://example.test/e/42");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Regex for the first URL-looking run of non-whitespace in prose.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("Invalid URL regex"));

/// Resolves the canonical link for an event.
///
/// 1. A declared URL that is non-empty after trimming is returned trimmed.
/// 2. Otherwise the first URL in `description` is returned, with one trailing
///    `)` removed (links written in parentheses pick it up).
/// 3. Otherwise an empty string.
pub fn resolve_link(declared: Option<&str>, description: Option<&str>) -> String {
    if let Some(url) = declared.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    description
        .and_then(extract_first_url)
        .unwrap_or_default()
}

/// Finds the first URL in `text`, dropping a single trailing `)`.
pub fn extract_first_url(text: &str) -> Option<String> {
    URL_REGEX.find(text.trim()).map(|m| {
        let url = m.as_str();
        url.strip_suffix(')').unwrap_or(url).to_string()
    })
}
