//! Message body preprocessing.
//!
//! rsyslog escapes control characters as `#NNN`. Digits starting with `0`
//! are octal (`#011` is a tab, `#012` a newline); anything else is decimal.
//! Tokens that do not name a byte value are left as they are.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

static ESCAPE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d{3})").expect("escape token pattern is valid"));

/// Replace `#NNN` tokens with the Latin-1 character they encode.
pub fn decode_escapes(message: &str) -> Cow<'_, str> {
    ESCAPE_TOKEN.replace_all(message, |caps: &Captures<'_>| {
        let digits = &caps[1];
        let radix = if digits.starts_with('0') { 8 } else { 10 };
        match u32::from_str_radix(digits, radix).ok().and_then(|v| u8::try_from(v).ok()) {
            Some(byte) => char::from(byte).to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Decode escapes and drop one leading space.
pub fn prepare(message: &str) -> String {
    let decoded = decode_escapes(message);
    match decoded.strip_prefix(' ') {
        Some(rest) => rest.to_string(),
        None => decoded.into_owned(),
    }
}

/// Split on newlines, discarding empty segments at the end.
pub fn segments(message: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = message.split('\n').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Split `s` after its first `n` characters.
pub fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

/// First `n` characters of `s`.
pub fn truncate_chars(s: &str, n: usize) -> &str {
    split_chars(s, n).0
}
