//! Text and field helpers used while normalizing courier responses
//!
//! None of these fail: malformed or missing input degrades to an empty
//! string or a caller-supplied placeholder.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Matches any HTML tag
fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Collapses runs of whitespace into single spaces and trims both ends
///
/// # Example
///
/// ```
/// use parcel_tracker::record::normalize::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Delivered \n  Successfully "), "Delivered Successfully");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces HTML tags with spaces, then collapses whitespace
pub fn strip_tags(text: &str) -> String {
    collapse_whitespace(&tag_pattern().replace_all(text, " "))
}

/// Splits a timestamp into its first and second tokens
///
/// Tokens are whitespace-delimited. A value without whitespace is split once
/// on `T` instead, so both `"2024-01-02 10:30:00"` and
/// `"2024-01-02T10:30:00"` yield `("2024-01-02", "10:30:00")`. The time part
/// is not truncated.
pub fn split_timestamp(value: &str) -> (String, String) {
    let mut tokens = value.split_whitespace();
    let first = tokens.next().unwrap_or_default();

    match tokens.next() {
        Some(second) => (first.to_string(), second.to_string()),
        None => match first.split_once('T') {
            Some((date, time)) => (date.to_string(), time.to_string()),
            None => (first.to_string(), String::new()),
        },
    }
}

/// Splits an ISO 8601 datetime on the literal `T`
///
/// The date is everything before `T` (the whole value when there is no `T`);
/// the time is at most five characters after it (`HH:MM`).
pub fn split_iso_datetime(value: &str) -> (String, String) {
    match value.split_once('T') {
        Some((date, rest)) => (date.to_string(), rest.chars().take(5).collect()),
        None => (value.to_string(), String::new()),
    }
}

/// Renders a scalar JSON value as text
///
/// Strings are returned as-is when non-empty, numbers and booleans are
/// formatted; everything else is treated as missing.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the first non-empty string among `keys` of a JSON object
pub fn first_string(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Like [`first_string`], falling back to `default`
pub fn first_string_or(object: &Value, keys: &[&str], default: &str) -> String {
    first_string(object, keys).unwrap_or_else(|| default.to_string())
}

/// Renders `object[key]` as text, falling back to `default`
pub fn field_text_or(object: &Value, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(value_text)
        .unwrap_or_else(|| default.to_string())
}
