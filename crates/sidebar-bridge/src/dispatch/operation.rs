//! The table of operations the sidebar may call.

use std::fmt;

use sidebar_types::Job;

use super::errors::DispatchError;
use crate::operations::{self, OperationError, Services};

/// Handler for operations that take a job envelope.
pub type JobHandler = fn(&mut Services, &mut Job) -> Result<(), OperationError>;

/// Operations exposed to the sidebar, named as the sidebar calls them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Clear a range or a whole sheet.
    Clear,
    /// Bring a tab to the front. Takes a tab name rather than a job.
    GoToTab,
    /// Ask the entity loader which items to load.
    IdentifySpecifiedItemsToLoad,
    /// Load items through the entity loader.
    CmLoad,
    /// Push rows through the entity loader.
    CmPush,
    /// Update the feed through the entity loader.
    UpdateFeed,
    /// Persist the id map.
    SaveIdMap,
    /// Read back the id map.
    LoadIdMap,
    /// Append sub-job logs to the log sheet.
    WriteLogs,
    /// Allocate the next job id.
    InitializeJob,
    /// Plan push sub-jobs through the entity loader.
    CreatePushJobs,
}

impl Operation {
    /// Every operation, in the order the sidebar documents them.
    pub const ALL: [Self; 11] = [
        Self::Clear,
        Self::GoToTab,
        Self::IdentifySpecifiedItemsToLoad,
        Self::CmLoad,
        Self::CmPush,
        Self::UpdateFeed,
        Self::SaveIdMap,
        Self::LoadIdMap,
        Self::WriteLogs,
        Self::InitializeJob,
        Self::CreatePushJobs,
    ];

    /// Resolves an operation name. Names are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownOperation`] for names outside the
    /// table.
    pub fn parse(name: &str) -> Result<Self, DispatchError> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == name)
            .ok_or_else(|| DispatchError::unknown_operation(name))
    }

    /// Name used by the sidebar.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::GoToTab => "goToTab",
            Self::IdentifySpecifiedItemsToLoad => "identifySpecifiedItemsToLoad",
            Self::CmLoad => "cmLoad",
            Self::CmPush => "cmPush",
            Self::UpdateFeed => "updateFeed",
            Self::SaveIdMap => "saveIdMap",
            Self::LoadIdMap => "loadIdMap",
            Self::WriteLogs => "writeLogs",
            Self::InitializeJob => "initializeJob",
            Self::CreatePushJobs => "createPushJobs",
        }
    }

    /// Handler for job operations; `None` for [`Operation::GoToTab`].
    #[must_use]
    pub fn job_handler(self) -> Option<JobHandler> {
        let handler: JobHandler = match self {
            Self::GoToTab => return None,
            Self::Clear => operations::clear,
            Self::IdentifySpecifiedItemsToLoad => operations::identify_items_to_load,
            Self::CmLoad => operations::cm_load,
            Self::CmPush => operations::cm_push,
            Self::UpdateFeed => operations::update_feed,
            Self::SaveIdMap => operations::save_id_map,
            Self::LoadIdMap => operations::load_id_map,
            Self::WriteLogs => operations::write_logs,
            Self::InitializeJob => operations::initialize_job,
            Self::CreatePushJobs => operations::create_push_jobs,
        };
        Some(handler)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
