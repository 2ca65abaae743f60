//! Finding URLs in free text and swapping them for short links.
//!
//! Detection uses the common "greedy URL" heuristic: a scheme (`http`,
//! `https`, `ftp`, `file`) or a `www.`/`ftp.` prefix, followed by URL
//! characters, never ending on sentence punctuation such as `.` `,` `!` `?`
//! or `:`. Word boundaries are ASCII-only, so a URL glued to non-ASCII text
//! (`詳細はhttp://...`) is still found.

use std::sync::LazyLock;

use regex::Regex;

/// Text substituted for a URL the service would not shorten.
pub const NOT_AVAILABLE: &str = "";

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?-u:\b)(?:(?:https?|ftp|file)://|www\.|ftp\.)[\-A-Z0-9+&@#/%=~_|$?!:,.]*[A-Z0-9+&@#/%=~_|$]",
    )
    .unwrap()
});

/// URL-like substrings of `text`, left to right. Repeated URLs appear once
/// per occurrence.
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Replace every URL in `text` with the result of `shorten`.
///
/// All URLs are shortened first, in order. Each match then replaces the first
/// remaining occurrence of its exact text. When `shorten` yields `None` the
/// occurrence is replaced by [`NOT_AVAILABLE`]. The first error aborts the
/// rewrite.
pub fn rewrite_urls<F, E>(text: &str, mut shorten: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<Option<String>, E>,
{
    let urls = find_urls(text);
    if urls.is_empty() {
        return Ok(text.to_string());
    }

    let mut replacements = Vec::with_capacity(urls.len());
    for &url in &urls {
        replacements.push(shorten(url)?);
    }

    let mut rewritten = text.to_string();
    for (url, replacement) in urls.into_iter().zip(replacements) {
        let replacement = replacement.as_deref().unwrap_or(NOT_AVAILABLE);
        rewritten = rewritten.replacen(url, replacement, 1);
    }
    Ok(rewritten)
}
