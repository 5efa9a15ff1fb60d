//! Normalization of the stored `connected` field.
//!
//! The admitted-token list is logically an ordered sequence of strings,
//! serialized as embedded JSON inside the room's metadata record. Depending
//! on the backend, a reader may see the value already deserialized into a
//! structured array, as a raw JSON string, or not at all. Every reader in
//! the codebase goes through [`normalize`] so the three shapes cannot
//! drift apart between the admission path and token re-validation.

use std::collections::HashSet;

use serde_json::Value;

/// Hash field holding the admitted-token sequence.
pub const CONNECTED_FIELD: &str = "connected";

/// Hash field holding the room creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Normalize a stored `connected` value into the admitted-token sequence.
///
/// Accepted shapes:
/// - a structured JSON array (the store deserialized the value);
/// - a raw string containing JSON, if it decodes to an array;
/// - absent or null.
///
/// Anything else degrades to an empty sequence. Normalization never fails:
/// a malformed stored value reads as an empty room, it does not block
/// admission. Duplicate entries are preserved; only [`distinct_count`]
/// collapses them. Non-string elements are skipped.
pub fn normalize(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => string_items(items),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => string_items(&items),
            _ => Vec::new(),
        },
        Some(_) => Vec::new(),
    }
}

/// Number of unique tokens in an admitted sequence.
///
/// The distinct count, not the raw sequence length, is the quantity gated
/// against the capacity bound: legacy duplicate entries must not consume
/// extra slots.
pub fn distinct_count(tokens: &[String]) -> usize {
    tokens.iter().collect::<HashSet<_>>().len()
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}
