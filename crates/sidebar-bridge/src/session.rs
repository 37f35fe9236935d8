//! Session-scoped job identifiers.

use sidebar_types::JobId;

use crate::collaborators::PropertyStore;
use crate::operations::OperationError;

/// Per-user session state kept in the property store.
///
/// The only state today is the job counter: a decimal string stored under
/// `job_id_key`. The first job of a session is numbered 0 and every later
/// one is numbered one higher than the last, with no gaps.
pub struct Session {
    properties: Box<dyn PropertyStore>,
    job_id_key: String,
}

impl Session {
    /// Creates a session that keeps its counter under `job_id_key`.
    pub fn new(properties: Box<dyn PropertyStore>, job_id_key: impl Into<String>) -> Self {
        Self {
            properties,
            job_id_key: job_id_key.into(),
        }
    }

    /// Property key holding the counter.
    #[must_use]
    pub fn job_id_key(&self) -> &str {
        &self.job_id_key
    }

    /// Allocates the next job identifier and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidJobId`] when the stored counter is not
    /// a non-negative integer, [`OperationError::JobIdOverflow`] when it cannot
    /// be advanced, and [`OperationError::Store`] when the property store
    /// fails.
    pub fn next_job_id(&mut self) -> Result<JobId, OperationError> {
        let next = match self.properties.get_property(&self.job_id_key)? {
            None => JobId::FIRST,
            Some(stored) => {
                let current: JobId = stored
                    .parse()
                    .map_err(|_| OperationError::invalid_job_id(stored.as_str()))?;
                current.next().ok_or(OperationError::JobIdOverflow)?
            }
        };
        self.properties
            .set_property(&self.job_id_key, &next.to_string())?;
        Ok(next)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("job_id_key", &self.job_id_key)
            .finish_non_exhaustive()
    }
}
