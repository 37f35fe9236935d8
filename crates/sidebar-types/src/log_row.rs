//! Two-column log rows produced by sub-jobs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single row destined for the two-column log sheet.
///
/// Encoded as a two-element JSON array, `["INFO", "message"]`, which is the
/// shape the sidebar emits and the sheet layer writes. Cells are kept as JSON
/// values, so a numeric timestamp in the first column is written unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow(Value, Value);

impl LogRow {
    /// Creates a row from its two cells.
    #[must_use]
    pub fn new(level: impl Into<Value>, message: impl Into<Value>) -> Self {
        Self(level.into(), message.into())
    }

    /// First column: the level or timestamp written by the sub-job.
    #[must_use]
    pub fn level(&self) -> &Value {
        &self.0
    }

    /// Second column: the message.
    #[must_use]
    pub fn message(&self) -> &Value {
        &self.1
    }

    /// Consumes the row and returns both cells in column order.
    #[must_use]
    pub fn into_cells(self) -> [Value; 2] {
        [self.0, self.1]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn encodes_as_pair() {
        let row = LogRow::new("ERROR", "push failed");
        let encoded = serde_json::to_string(&row).expect("encode");
        assert_eq!(encoded, r#"["ERROR","push failed"]"#);
    }

    #[test]
    fn keeps_non_string_cells() {
        let row: LogRow =
            serde_json::from_str(r#"[1700000000000,"timestamped"]"#).expect("decode");
        assert_eq!(row.level(), &json!(1_700_000_000_000_u64));
        assert_eq!(row.into_cells(), [json!(1_700_000_000_000_u64), json!("timestamped")]);
    }

    #[test]
    fn rejects_rows_of_the_wrong_width() {
        assert!(serde_json::from_str::<LogRow>(r#"["INFO"]"#).is_err());
        assert!(serde_json::from_str::<LogRow>(r#"["INFO","a","b"]"#).is_err());
    }
}
