use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Sheet that receives job log rows.
pub const DEFAULT_LOG_SHEET: &str = "Log";

/// Sheet that holds the persisted id map.
pub const DEFAULT_STORE_SHEET: &str = "Store";

/// Session property key of the job counter.
pub const DEFAULT_JOB_ID_PROPERTY: &str = "jobId";

/// Largest string a hosted spreadsheet accepts in a single cell.
pub const DEFAULT_STORE_CHUNK_SIZE: usize = 50_000;

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned default log sheet name.
#[must_use]
pub fn default_log_sheet() -> String {
    DEFAULT_LOG_SHEET.to_owned()
}

/// Owned default store sheet name.
#[must_use]
pub fn default_store_sheet() -> String {
    DEFAULT_STORE_SHEET.to_owned()
}

/// Owned default job counter property key.
#[must_use]
pub fn default_job_id_property() -> String {
    DEFAULT_JOB_ID_PROPERTY.to_owned()
}

/// Default id-map cell size.
#[must_use]
pub fn default_store_chunk_size() -> usize {
    DEFAULT_STORE_CHUNK_SIZE
}
