use regex::Regex;
use std::sync::LazyLock;

// Letters, decimal digits, punctuation and whitespace survive.
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{Nd}\p{P}\s]").expect("static regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Drop symbols, emoji and control characters.
pub fn filter_chars(text: &str) -> String {
    DISALLOWED_CHARS.replace_all(text, "").into_owned()
}

/// Drop blank lines, join the rest with a single space and collapse every
/// whitespace run to one space.
pub fn normalize_whitespace(text: &str) -> String {
    let joined = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    WHITESPACE_RUN.replace_all(&joined, " ").into_owned()
}
