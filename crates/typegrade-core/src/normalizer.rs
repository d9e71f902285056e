//! Text sanitization and word tokenization.
//!
//! Only Unicode letters, Unicode numbers, spaces, commas and periods survive
//! sanitization. Everything else becomes a space, so stripping a character
//! never glues two words together. Case and accents are left untouched.

use std::sync::LazyLock;

use regex::Regex;

static CONTROL_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r\t]+").expect("valid control whitespace pattern"));
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N} .,]+").expect("valid character filter pattern"));
static SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Clean raw text down to single-space separated words.
pub fn sanitize(raw: &str) -> String {
    let text = CONTROL_WS_RE.replace_all(raw, " ");
    let text = DISALLOWED_RE.replace_all(&text, " ");
    let text = SPACES_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Split raw text into comparable word tokens.
///
/// Commas and periods stay attached to the word they follow, so `"café,"`
/// and `"café"` are different tokens.
pub fn tokenize(raw: &str) -> Vec<String> {
    let cleaned = sanitize(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }
    cleaned.split(' ').map(str::to_string).collect()
}
