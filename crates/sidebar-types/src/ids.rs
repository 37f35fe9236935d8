//! Identifier types carried by the job envelope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Identifier of an item in the external platform.
///
/// The sidebar sends numeric identifiers for persisted items and textual
/// placeholders (for example `ext-12`) for items that have not been pushed
/// yet, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Identifier assigned by the external platform.
    Numeric(u64),
    /// Identifier kept as text.
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Session-scoped job identifier used to namespace cache entries.
///
/// Serialized as a JSON number. Decoding also accepts a decimal string
/// because the value is persisted as text in the session property store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "JobIdRepr", into = "u64")]
pub struct JobId(u64);

impl JobId {
    /// Identifier handed out on the first initialisation of a session.
    pub const FIRST: Self = Self(0);

    /// Wraps a raw counter value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` on overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<JobId> for u64 {
    fn from(value: JobId) -> Self {
        value.0
    }
}

impl FromStr for JobId {
    type Err = JobIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| JobIdParseError {
                value: value.to_owned(),
            })
    }
}

/// Error returned when a job identifier is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job id '{value}' is not a non-negative integer")]
pub struct JobIdParseError {
    /// The rejected text.
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobIdRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<JobIdRepr> for JobId {
    type Error = JobIdParseError;

    fn try_from(value: JobIdRepr) -> Result<Self, Self::Error> {
        match value {
            JobIdRepr::Number(number) => Ok(Self(number)),
            JobIdRepr::Text(text) => text.parse(),
        }
    }
}

/// Mapping from a logical (sheet-side) key to an external identifier.
///
/// The values are left as JSON because the id store nests maps per entity
/// and the bridge never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdMap(Map<String, Value>);

impl IdMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the identifier stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the map holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for IdMap {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!("7"), 7)]
    #[case(json!(" 12 "), 12)]
    fn job_id_accepts_numbers_and_decimal_text(#[case] input: Value, #[case] expected: u64) {
        let id: JobId = serde_json::from_value(input).expect("decode job id");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case(json!("abc"))]
    #[case(json!(-1))]
    #[case(json!("-3"))]
    fn job_id_rejects_non_counters(#[case] input: Value) {
        assert!(serde_json::from_value::<JobId>(input).is_err());
    }

    #[test]
    fn job_id_serializes_as_number() {
        let encoded = serde_json::to_string(&JobId::new(3)).expect("encode");
        assert_eq!(encoded, "3");
    }

    #[test]
    fn job_id_next_stops_at_overflow() {
        assert_eq!(JobId::FIRST.next(), Some(JobId::new(1)));
        assert_eq!(JobId::new(u64::MAX).next(), None);
    }

    #[test]
    fn item_ids_keep_their_form() {
        let ids: Vec<ItemId> =
            serde_json::from_value(json!([42, "ext-1"])).expect("decode ids");
        assert_eq!(ids, vec![ItemId::Numeric(42), ItemId::from("ext-1")]);
        assert_eq!(ids.iter().map(ToString::to_string).collect::<Vec<_>>(), [
            "42", "ext-1"
        ]);
    }

    #[test]
    fn id_map_is_a_plain_object() {
        let mut map = IdMap::new();
        map.insert("Campaign", json!({"ext-1": 1001}));
        let encoded = serde_json::to_value(&map).expect("encode");
        assert_eq!(encoded, json!({"Campaign": {"ext-1": 1001}}));
        assert_eq!(map.len(), 1);
        assert!(map.get("Campaign").is_some());
    }
}
