//! Bridge bootstrap orchestration.

use std::io::{BufRead, Write};
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;
use tracing::info;

use sidebar_config::Config;

use crate::assets::{AssetError, HtmlAssets};
use crate::collaborators::{
    FilePropertyStore, LoaderRegistry, MemoryPropertyStore, MemoryWorkbook, PropertyStore,
    SheetIdStore, StoreError,
};
use crate::dispatch::{Dispatcher, StdioServer, TransportError};
use crate::operations::Services;
use crate::session::Session;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the bridge configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The session property file could not be opened.
    #[error("failed to open session properties: {source}")]
    Properties {
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// The HTML asset directory could not be opened.
    #[error("failed to open HTML assets: {source}")]
    Assets {
        /// Underlying asset error.
        #[source]
        source: AssetError,
    },
}

/// Result of a successful bootstrap invocation.
#[derive(Debug)]
pub struct Bridge {
    config: Config,
    telemetry: TelemetryHandle,
    server: StdioServer,
}

impl Bridge {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Dispatcher serving job calls. Hosts register entity loaders here.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        self.server.dispatcher_mut()
    }

    /// Serves JSONL requests until `reader` is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: W,
    ) -> Result<usize, TransportError> {
        self.server.serve(reader, writer)
    }
}

/// Wires the reference collaborators described by `config`.
///
/// Sheets live in a [`MemoryWorkbook`] pre-populated with the log and store
/// sheets; the id map is persisted in the store sheet. Session properties
/// are kept in `config.properties_path` when set, otherwise in memory. No
/// loaders are registered.
///
/// # Errors
///
/// Returns [`BootstrapError::Properties`] if the property file's directory
/// cannot be opened.
pub fn build_services(config: &Config) -> Result<Services, BootstrapError> {
    let workbook = MemoryWorkbook::with_sheets([config.log_sheet(), config.store_sheet()]);
    let id_store = SheetIdStore::new(
        workbook.clone(),
        config.store_sheet(),
        config.store_chunk_size(),
    );
    let properties: Box<dyn PropertyStore> = match config.properties_path() {
        Some(path) => Box::new(
            FilePropertyStore::open(path)
                .map_err(|source| BootstrapError::Properties { source })?,
        ),
        None => Box::new(MemoryPropertyStore::new()),
    };

    Ok(Services::new(
        Box::new(workbook),
        Box::new(id_store),
        LoaderRegistry::new(),
        Session::new(properties, config.job_id_property()),
        config.log_sheet(),
    ))
}

/// Bootstraps the bridge using the supplied configuration loader.
///
/// # Errors
///
/// Returns [`BootstrapError`] if configuration, telemetry, session
/// properties or HTML assets cannot be set up.
pub fn bootstrap_with(loader: &dyn ConfigLoader) -> Result<Bridge, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let services = build_services(&config)?;
    let mut server = StdioServer::new(Dispatcher::new(services));
    if let Some(dir) = config.asset_dir() {
        let assets = HtmlAssets::open(dir).map_err(|source| BootstrapError::Assets { source })?;
        server = server.with_assets(assets);
    }

    info!(
        log_sheet = config.log_sheet(),
        store_sheet = config.store_sheet(),
        persistent_properties = config.properties_path().is_some(),
        "bridge ready"
    );
    Ok(Bridge {
        config,
        telemetry,
        server,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    struct FailingLoader;

    impl ConfigLoader for FailingLoader {
        fn load(&self) -> Result<Config, Arc<OrthoError>> {
            Config::load_from_iter(["sidebar-bridge", "--store-chunk-size", "many"])
        }
    }

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).expect("utf8 temp path")
    }

    #[test]
    fn bootstraps_and_serves_with_defaults() {
        let mut bridge =
            bootstrap_with(&StaticConfigLoader::new(Config::default())).expect("bootstrap");
        let mut output = Vec::new();
        let answered = bridge
            .serve(
                Cursor::new(b"{\"operation\":\"initializeJob\",\"payload\":\"{}\"}\n".to_vec()),
                &mut output,
            )
            .expect("serve");

        assert_eq!(answered, 1);
        assert_eq!(
            String::from_utf8(output).expect("utf8"),
            "{\"kind\":\"ok\",\"payload\":\"{\\\"jobId\\\":0}\"}\n"
        );
    }

    #[test]
    fn reports_configuration_failures() {
        let error = bootstrap_with(&FailingLoader).expect_err("bad chunk size");
        assert!(matches!(error, BootstrapError::Configuration { .. }));
    }

    #[test]
    fn reports_missing_asset_directories() {
        let temp = TempDir::new().expect("temp dir");
        let config = Config {
            asset_dir: Some(utf8(temp.path().join("absent"))),
            ..Config::default()
        };
        let error = bootstrap_with(&StaticConfigLoader::new(config)).expect_err("no assets");
        assert!(matches!(error, BootstrapError::Assets { .. }));
    }

    #[rstest]
    #[case::memory(false)]
    #[case::file(true)]
    fn built_services_hand_out_job_ids(#[case] persistent: bool) {
        let temp = TempDir::new().expect("temp dir");
        let config = Config {
            properties_path: persistent.then(|| utf8(temp.path().join("session.json"))),
            ..Config::default()
        };
        let services = build_services(&config).expect("services");
        assert!(services.loaders().is_empty());

        let mut dispatcher = Dispatcher::new(services);
        assert_eq!(
            dispatcher.invoke("initializeJob", "{}").as_deref(),
            Ok(r#"{"jobId":0}"#)
        );
        assert_eq!(temp.path().join("session.json").exists(), persistent);
    }
}
