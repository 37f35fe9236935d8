//! Job operations invoked by the dispatcher.
//!
//! Each handler receives the shared [`Services`] and the decoded job, calls
//! out to collaborators, and writes its results back onto the job. Handlers
//! never serialize anything themselves: on success the dispatcher returns the
//! job as it was left, and on failure it returns the same job with the error
//! attached, so any field set before the failure still reaches the sidebar.

mod errors;
mod id_map;
mod jobs;
mod loaders;
mod logs;
mod sheets;

use sidebar_types::Job;

use crate::collaborators::{IdStore, Loader, LoaderRegistry, SheetStore};
use crate::session::Session;

pub use self::errors::OperationError;
pub use self::id_map::{load_id_map, save_id_map};
pub use self::jobs::initialize_job;
pub use self::loaders::{cm_load, cm_push, create_push_jobs, identify_items_to_load, update_feed};
pub use self::logs::write_logs;
pub use self::sheets::{clear, go_to_tab};

/// Collaborators shared by every operation.
pub struct Services {
    sheets: Box<dyn SheetStore>,
    id_store: Box<dyn IdStore>,
    loaders: LoaderRegistry,
    session: Session,
    log_sheet: String,
}

impl Services {
    /// Bundles the collaborators. Log rows are written to `log_sheet`.
    pub fn new(
        sheets: Box<dyn SheetStore>,
        id_store: Box<dyn IdStore>,
        loaders: LoaderRegistry,
        session: Session,
        log_sheet: impl Into<String>,
    ) -> Self {
        Self {
            sheets,
            id_store,
            loaders,
            session,
            log_sheet: log_sheet.into(),
        }
    }

    /// Registered entity loaders.
    #[must_use]
    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    /// Mutable access for registering loaders after construction.
    pub fn loaders_mut(&mut self) -> &mut LoaderRegistry {
        &mut self.loaders
    }

    /// Sheet receiving log rows.
    #[must_use]
    pub fn log_sheet(&self) -> &str {
        &self.log_sheet
    }

    /// Resolves the loader named by `job.entity`.
    fn loader_for(&self, job: &Job) -> Result<&dyn Loader, OperationError> {
        let entity = job
            .entity
            .as_deref()
            .ok_or_else(|| OperationError::missing_field("entity"))?;
        self.loaders
            .get(entity)
            .ok_or_else(|| OperationError::unknown_entity(entity))
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("loaders", &self.loaders)
            .field("session", &self.session)
            .field("log_sheet", &self.log_sheet)
            .finish_non_exhaustive()
    }
}
