//! Lenient decoding of caller payloads.

use serde_json::Value;

/// Decodes `input` as JSON, or returns it unchanged as a JSON string.
///
/// The sidebar sends either serialized jobs or bare strings such as a tab
/// name, so text that is not valid JSON is passed through as itself.
#[must_use]
pub fn safe_parse(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_owned()))
}
