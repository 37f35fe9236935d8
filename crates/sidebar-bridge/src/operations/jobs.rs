//! Job lifecycle operations.

use sidebar_types::Job;

use super::{OperationError, Services};

/// Allocates the next session job id and stores it on `job.jobId`.
///
/// # Errors
///
/// Returns the session counter failures described on
/// [`Session::next_job_id`](crate::session::Session::next_job_id).
pub fn initialize_job(services: &mut Services, job: &mut Job) -> Result<(), OperationError> {
    job.job_id = Some(services.session.next_job_id()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sidebar_types::JobId;

    use super::*;
    use crate::collaborators::{LoaderRegistry, StoreError};
    use crate::tests::support::{MockIds, MockProperties, MockSheets, memory_services, services};

    #[test]
    fn overwrites_any_job_id_sent_by_the_caller() {
        let (mut services, _workbook, _properties) = memory_services();
        let mut job = Job {
            job_id: Some(JobId::new(99)),
            ..Job::new()
        };
        initialize_job(&mut services, &mut job).expect("initialize");
        assert_eq!(job.job_id, Some(JobId::FIRST));
    }

    #[test]
    fn property_failures_propagate() {
        let mut properties = MockProperties::new();
        properties
            .expect_get_property()
            .returning(|_| Err(StoreError::backend("properties unavailable")));
        let mut services = services(
            MockSheets::new(),
            MockIds::new(),
            LoaderRegistry::new(),
            properties,
        );

        let mut job = Job::new();
        let error = initialize_job(&mut services, &mut job).expect_err("store failure");
        assert_eq!(error.to_string(), "properties unavailable");
        assert!(job.job_id.is_none());
    }
}
