//! Best-effort removal of script-like content
//!
//! Not a security boundary. Matches are deleted from the raw text before
//! parsing; text that no longer parses is rejected by the next gate.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

const PATTERNS: &[&str] = &[
    r"(?is)<script\b[^>]*>.*?</script\s*>",
    r"(?i)</?script\b[^>]*>",
    r"(?i)javascript\s*:",
    r"(?i)\bon[a-z]+\s*=",
    r"\beval\s*\(",
    r"\bnew\s+Function\s*\(",
    r"\bsetTimeout\s*\(",
    r"\bsetInterval\s*\(",
];

static COMPILED: Lazy<Vec<Regex>> =
    Lazy::new(|| PATTERNS.iter().filter_map(|p| Regex::new(p).ok()).collect());

/// Sanitized text and how many fragments were removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized<'a> {
    /// Text with matches removed; borrowed when nothing matched
    pub text: Cow<'a, str>,
    /// Number of removed fragments
    pub removed: usize,
}

/// Strip script blocks, `javascript:` markers, inline handlers and
/// dynamic-evaluation calls
#[must_use]
pub fn sanitize(raw: &str) -> Sanitized<'_> {
    let mut text = Cow::Borrowed(raw);
    let mut removed = 0;
    for pattern in COMPILED.iter() {
        let hits = pattern.find_iter(&text).count();
        if hits > 0 {
            removed += hits;
            text = Cow::Owned(pattern.replace_all(&text, "").into_owned());
        }
    }
    Sanitized { text, removed }
}
