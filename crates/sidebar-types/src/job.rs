//! The job envelope exchanged on every sidebar call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{IdMap, ItemId, JobId};
use crate::log_row::LogRow;

/// Serializable record passed into and returned from every operation.
///
/// All fields are optional; each operation reads the ones it needs and
/// writes its results back onto the same value. Absent fields are omitted on
/// output rather than encoded as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Tag selecting the loader that handles load and push operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Specific item identifiers to load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids_to_load: Option<Vec<ItemId>>,
    /// Parent items whose children should be loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_item_ids: Option<Vec<ItemId>>,
    /// Feed rows forwarded untouched to the loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<Value>,
    /// Single feed item forwarded untouched to the loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_item: Option<Value>,
    /// Logical key to external identifier map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_map: Option<IdMap>,
    /// Sheet targeted by `clear`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    /// A1 range targeted by `clear`; the whole sheet when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Ordered sub-jobs, each of which may carry log rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<SubJob>>,
    /// Row cursor into the log sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Session job identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Failure message, present only on the failure path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fields the bridge does not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Creates an empty envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an envelope tagged with `entity`.
    #[must_use]
    pub fn for_entity(entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            ..Self::default()
        }
    }
}

/// A unit of work tracked by the sidebar inside a parent job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubJob {
    /// Log rows not yet written to the log sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogRow>>,
    /// Remaining sub-job fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubJob {
    /// Creates a sub-job holding `logs`.
    #[must_use]
    pub fn with_logs(logs: Vec<LogRow>) -> Self {
        Self {
            logs: Some(logs),
            extra: Map::new(),
        }
    }

    /// Takes every pending row, leaving an empty log list behind.
    ///
    /// A sub-job without a log list yields nothing but still ends up with an
    /// empty one, so a drained job always reports `"logs": []`.
    pub fn drain_logs(&mut self) -> Vec<LogRow> {
        self.logs.replace(Vec::new()).unwrap_or_default()
    }
}
