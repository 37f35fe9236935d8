//! Shared configuration for the sidebar bridge.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! TOML file, then `SIDEBAR_*` environment variables, then command-line
//! flags. The resolved [`Config`] names the sheets the bridge writes to, the
//! session property key of the job counter, and the telemetry settings.

mod defaults;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use self::defaults::{
    DEFAULT_JOB_ID_PROPERTY, DEFAULT_LOG_FILTER, DEFAULT_LOG_SHEET, DEFAULT_STORE_CHUNK_SIZE,
    DEFAULT_STORE_SHEET, default_job_id_property, default_log_filter, default_log_filter_string,
    default_log_format, default_log_sheet, default_store_chunk_size, default_store_sheet,
};
pub use self::logging::{LogFormat, LogFormatParseError};

/// Resolved bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SIDEBAR")]
pub struct Config {
    /// `tracing` filter expression, for example `info` or `sidebar_bridge=debug`.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format of the diagnostic log.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Sheet receiving job log rows.
    #[serde(default = "default_log_sheet")]
    pub log_sheet: String,
    /// Sheet holding the serialized id map.
    #[serde(default = "default_store_sheet")]
    pub store_sheet: String,
    /// Session property key of the job counter.
    #[serde(default = "default_job_id_property")]
    pub job_id_property: String,
    /// Maximum characters per cell when persisting the id map.
    #[serde(default = "default_store_chunk_size")]
    pub store_chunk_size: usize,
    /// Directory holding the sidebar HTML fragments served by `include`.
    #[serde(default)]
    pub asset_dir: Option<Utf8PathBuf>,
    /// File backing the session property store; kept in memory when unset.
    #[serde(default)]
    pub properties_path: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            log_sheet: default_log_sheet(),
            store_sheet: default_store_sheet(),
            job_id_property: default_job_id_property(),
            store_chunk_size: default_store_chunk_size(),
            asset_dir: None,
            properties_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments, environment and
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer fails to parse.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Loads configuration using `args` in place of the process arguments.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer fails to parse.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Filter expression applied to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format of the telemetry subscriber.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Sheet receiving job log rows.
    #[must_use]
    pub fn log_sheet(&self) -> &str {
        &self.log_sheet
    }

    /// Sheet holding the serialized id map.
    #[must_use]
    pub fn store_sheet(&self) -> &str {
        &self.store_sheet
    }

    /// Session property key of the job counter.
    #[must_use]
    pub fn job_id_property(&self) -> &str {
        &self.job_id_property
    }

    /// Maximum characters per persisted id-map cell, never below one.
    #[must_use]
    pub fn store_chunk_size(&self) -> usize {
        self.store_chunk_size.max(1)
    }

    /// Directory of sidebar HTML fragments, when configured.
    #[must_use]
    pub fn asset_dir(&self) -> Option<&Utf8PathBuf> {
        self.asset_dir.as_ref()
    }

    /// File backing the session property store, when configured.
    #[must_use]
    pub fn properties_path(&self) -> Option<&Utf8PathBuf> {
        self.properties_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_name_the_standard_sheets() {
        let config = Config::default();
        assert_eq!(config.log_sheet(), "Log");
        assert_eq!(config.store_sheet(), "Store");
        assert_eq!(config.job_id_property(), "jobId");
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.store_chunk_size(), 50_000);
        assert!(config.asset_dir().is_none());
        assert!(config.properties_path().is_none());
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(128, 128)]
    fn chunk_size_is_clamped(#[case] configured: usize, #[case] effective: usize) {
        let config = Config {
            store_chunk_size: configured,
            ..Config::default()
        };
        assert_eq!(config.store_chunk_size(), effective);
    }
}
